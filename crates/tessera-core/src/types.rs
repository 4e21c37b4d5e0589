//! Declared parameter types and bag identifiers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::enums::EnumDescriptor;

/// Identifies one section of request data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BagId {
    /// Route attributes produced by the router.
    Attributes,
    /// Query string parameters.
    Query,
    /// Parsed request payload (JSON or form body).
    Body,
    /// Request headers.
    Headers,
    /// Uploaded files.
    Files,
}

impl BagId {
    /// Returns the canonical bag name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Query => "query",
            Self::Body => "body",
            Self::Headers => "headers",
            Self::Files => "files",
        }
    }

    /// Whether resolution works on a copy of the bag that is handed on to
    /// value producers as sibling context.
    ///
    /// Headers and files are read in place and producers only see the bound
    /// value.
    #[must_use]
    pub const fn is_snapshot(&self) -> bool {
        matches!(self, Self::Attributes | Self::Query | Self::Body)
    }
}

impl fmt::Display for BagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a bag name does not match any [`BagId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bag \"{0}\" for value resolution")]
pub struct UnknownBag(pub String);

impl FromStr for BagId {
    type Err = UnknownBag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attributes" | "route" => Ok(Self::Attributes),
            "query" => Ok(Self::Query),
            "body" | "request" => Ok(Self::Body),
            "headers" => Ok(Self::Headers),
            "files" => Ok(Self::Files),
            other => Err(UnknownBag(other.to_string())),
        }
    }
}

/// Concrete representation a temporal parameter asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemporalKind {
    /// Any temporal value; resolved as an instant in UTC.
    #[default]
    Utc,
    /// An instant that keeps the offset it was parsed with.
    Offset,
}

/// Family of unique identifiers a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UidKind {
    /// Any well-formed UUID.
    Any,
    /// Only UUIDs of the given version.
    Version(uuid::Version),
}

/// Declared type of a handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
    /// String.
    String,
    /// Array or mapping.
    Array,
    /// Date and time.
    DateTime(TemporalKind),
    /// Unique identifier.
    Uid(UidKind),
    /// Enumeration.
    Enum(Arc<EnumDescriptor>),
    /// Uploaded file.
    File,
    /// Any other named type, resolved by custom producers.
    Named(String),
}

impl DeclaredType {
    /// Returns a short name suitable for messages.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Array => "array",
            Self::DateTime(_) => "datetime",
            Self::Uid(_) => "uid",
            Self::Enum(descriptor) => descriptor.name(),
            Self::File => "file",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
