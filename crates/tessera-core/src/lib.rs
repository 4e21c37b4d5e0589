//! # Tessera Core
//!
//! Core types shared by the Tessera parameter binding crates.
//!
//! - [`Value`] - Dynamic request value (scalars, lists, ordered maps, objects)
//! - [`DeclaredType`] - Declared type of a handler parameter
//! - [`BagId`] - Identifier of a section of request data
//! - [`EnumDescriptor`] - Enumeration type description
//! - [`UploadedFile`] - File uploaded with the request
//! - [`ResolveError`] - Error taxonomy for parameter resolution

#![doc(html_root_url = "https://docs.rs/tessera-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod enums;
mod error;
mod file;
mod types;
mod value;

pub use enums::{Backing, EnumCase, EnumDescriptor, EnumValue};
pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, ResolveError, ResolveResult};
pub use file::UploadedFile;
pub use types::{BagId, DeclaredType, TemporalKind, UidKind, UnknownBag};
pub use value::{Value, ValueMap};
