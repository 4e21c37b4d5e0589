//! Source descriptors.
//!
//! A [`SourceDescriptor`] names the bag a parameter is read from, an optional
//! rename, and how the raw value is filtered. A parameter may carry several
//! descriptors; they are evaluated in declaration order.
//!
//! Two families of constructors exist and deliberately start from different
//! defaults:
//!
//! | Constructor | Flags | Throw on failure |
//! |---|---|---|
//! | [`from_route`], [`from_query`], [`from_body`], [`from_header`], [`from_file`] | resolver defaults (`EMPTY_STRING_NULL`) | resolver default (`true`) |
//! | [`SourceDescriptor::bag`] | none | `false` |
//!
//! [`from_route`]: SourceDescriptor::from_route
//! [`from_query`]: SourceDescriptor::from_query
//! [`from_body`]: SourceDescriptor::from_body
//! [`from_header`]: SourceDescriptor::from_header
//! [`from_file`]: SourceDescriptor::from_file

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use indexmap::IndexMap;
use tessera_config::ResolverConfig;
use tessera_core::{BagId, DeclaredType, ResolveError, ResolveResult};

/// Lookup name that selects the entire bag.
pub const WILDCARD: &str = "*";

/// Bitmask of filter flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilterFlags(u32);

impl FilterFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Report failures as null instead of failing.
    pub const NULL_ON_FAILURE: Self = Self(1 << 0);
    /// Treat empty strings as null for numeric filters.
    pub const EMPTY_STRING_NULL: Self = Self(1 << 1);
    /// Accept `0x` hexadecimal integers.
    pub const ALLOW_HEX: Self = Self(1 << 2);
    /// Accept `0` and `0o` prefixed octal integers.
    pub const ALLOW_OCTAL: Self = Self(1 << 3);
    /// Accept thousands separators in floats.
    pub const ALLOW_THOUSAND: Self = Self(1 << 5);
    /// Reject array input.
    pub const REQUIRE_SCALAR: Self = Self(1 << 6);
    /// Reject scalar input.
    pub const REQUIRE_ARRAY: Self = Self(1 << 7);
    /// Wrap scalar input into a one-element list.
    pub const FORCE_ARRAY: Self = Self(1 << 8);

    const NAMES: [(Self, &'static str); 8] = [
        (Self::NULL_ON_FAILURE, "NULL_ON_FAILURE"),
        (Self::EMPTY_STRING_NULL, "EMPTY_STRING_NULL"),
        (Self::ALLOW_HEX, "ALLOW_HEX"),
        (Self::ALLOW_OCTAL, "ALLOW_OCTAL"),
        (Self::ALLOW_THOUSAND, "ALLOW_THOUSAND"),
        (Self::REQUIRE_SCALAR, "REQUIRE_SCALAR"),
        (Self::REQUIRE_ARRAY, "REQUIRE_ARRAY"),
        (Self::FORCE_ARRAY, "FORCE_ARRAY"),
    ];

    /// Returns an empty set of flags.
    #[must_use]
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if all flags in `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any flag in `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for FilterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FilterFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for FilterFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("FilterFlags(NONE)");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "FilterFlags({})", names.join(" | "))
    }
}

/// Scalar filter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Validates and converts to an integer.
    Int,
    /// Validates and converts to a float.
    Float,
    /// Validates and converts to a boolean.
    Bool,
    /// Passes strings through, stringifying other scalars.
    Default,
}

impl FilterKind {
    /// Returns the filter implied by a declared parameter type, if any.
    #[must_use]
    pub fn for_declared_type(declared: Option<&DeclaredType>) -> Option<Self> {
        match declared? {
            DeclaredType::Int => Some(Self::Int),
            DeclaredType::Float => Some(Self::Float),
            DeclaredType::Bool => Some(Self::Bool),
            DeclaredType::String | DeclaredType::Array => Some(Self::Default),
            DeclaredType::DateTime(_)
            | DeclaredType::Uid(_)
            | DeclaredType::Enum(_)
            | DeclaredType::File
            | DeclaredType::Named(_) => None,
        }
    }

    /// Whether empty strings count as null under `EMPTY_STRING_NULL`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// Flags and constraints passed to a filter.
///
/// # Example
///
/// ```
/// use tessera_extract::{FilterFlags, FilterOptions};
///
/// let options = FilterOptions::new()
///     .flags(FilterFlags::ALLOW_HEX)
///     .max_range(100.0);
/// assert!(options.flags.contains(FilterFlags::ALLOW_HEX));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// Flag bitmask.
    pub flags: FilterFlags,
    /// Inclusive lower bound for numeric filters.
    pub min_range: Option<f64>,
    /// Inclusive upper bound for numeric filters.
    pub max_range: Option<f64>,
    /// Decimal separator for the float filter. Defaults to `.`.
    pub decimal: Option<char>,
    /// Add configured but missing keys as null in structural filters.
    pub add_empty: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            flags: FilterFlags::NONE,
            min_range: None,
            max_range: None,
            decimal: None,
            add_empty: true,
        }
    }
}

impl FilterOptions {
    /// Creates options without flags or constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flags.
    #[must_use]
    pub fn flags(mut self, flags: FilterFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn min_range(mut self, min: f64) -> Self {
        self.min_range = Some(min);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn max_range(mut self, max: f64) -> Self {
        self.max_range = Some(max);
        self
    }

    /// Sets the decimal separator.
    #[must_use]
    pub fn decimal(mut self, separator: char) -> Self {
        self.decimal = Some(separator);
        self
    }

    /// Sets whether structural filters add missing keys.
    #[must_use]
    pub fn add_empty(mut self, add_empty: bool) -> Self {
        self.add_empty = add_empty;
        self
    }

    pub(crate) fn in_range(&self, value: f64) -> bool {
        self.min_range.map_or(true, |min| value >= min)
            && self.max_range.map_or(true, |max| value <= max)
    }
}

impl From<FilterFlags> for FilterOptions {
    fn from(flags: FilterFlags) -> Self {
        Self::new().flags(flags)
    }
}

/// Filter for one key of a structural filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Filter kind.
    pub kind: FilterKind,
    /// Options for this key.
    pub options: FilterOptions,
}

impl FieldFilter {
    /// Creates a field filter with default options.
    #[must_use]
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            options: FilterOptions::default(),
        }
    }

    /// Sets the options.
    #[must_use]
    pub fn options(mut self, options: impl Into<FilterOptions>) -> Self {
        self.options = options.into();
        self
    }
}

impl From<FilterKind> for FieldFilter {
    fn from(kind: FilterKind) -> Self {
        Self::new(kind)
    }
}

/// Per-key filters of a structural filter, in output order.
pub type FilterMap = IndexMap<String, FieldFilter>;

/// Filter applied to a raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// A scalar filter.
    Kind(FilterKind),
    /// A key-by-key filter over a map.
    Structural(FilterMap),
}

impl FilterSpec {
    /// Returns the scalar kind, if this is not structural.
    #[must_use]
    pub const fn kind(&self) -> Option<FilterKind> {
        match self {
            Self::Kind(kind) => Some(*kind),
            Self::Structural(_) => None,
        }
    }
}

impl From<FilterKind> for FilterSpec {
    fn from(kind: FilterKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<FilterMap> for FilterSpec {
    fn from(map: FilterMap) -> Self {
        Self::Structural(map)
    }
}

/// Defaults applied to attribute-style descriptors that leave options or the
/// throw flag unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorDefaults {
    /// Flags used when a descriptor sets no options.
    pub flags: FilterFlags,
    /// Throw flag used when a descriptor does not set one.
    pub throw_on_failure: bool,
}

impl Default for DescriptorDefaults {
    fn default() -> Self {
        Self {
            flags: FilterFlags::EMPTY_STRING_NULL,
            throw_on_failure: true,
        }
    }
}

impl From<&ResolverConfig> for DescriptorDefaults {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            flags: if config.empty_string_as_null {
                FilterFlags::EMPTY_STRING_NULL
            } else {
                FilterFlags::NONE
            },
            throw_on_failure: config.throw_on_filter_failure,
        }
    }
}

/// Declares where a parameter's value comes from and how it is filtered.
///
/// # Example
///
/// ```
/// use tessera_core::BagId;
/// use tessera_extract::{FilterFlags, SourceDescriptor};
///
/// let descriptor = SourceDescriptor::from_query()
///     .renamed("theFoo")
///     .with_flags(FilterFlags::ALLOW_HEX);
///
/// assert_eq!(descriptor.bag_id(), BagId::Query);
/// assert_eq!(descriptor.lookup_name("foo"), "theFoo");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    bag: BagId,
    name: Option<String>,
    filter: Option<FilterSpec>,
    options: Option<FilterOptions>,
    throw_on_failure: Option<bool>,
}

impl SourceDescriptor {
    fn attribute_style(bag: BagId) -> Self {
        Self {
            bag,
            name: None,
            filter: None,
            options: None,
            throw_on_failure: None,
        }
    }

    /// Reads from route attributes.
    #[must_use]
    pub fn from_route() -> Self {
        Self::attribute_style(BagId::Attributes)
    }

    /// Reads from the query string.
    #[must_use]
    pub fn from_query() -> Self {
        Self::attribute_style(BagId::Query)
    }

    /// Reads from the decoded request body.
    #[must_use]
    pub fn from_body() -> Self {
        Self::attribute_style(BagId::Body)
    }

    /// Reads from request headers.
    #[must_use]
    pub fn from_header() -> Self {
        Self::attribute_style(BagId::Headers)
    }

    /// Reads an uploaded file. `name` overrides the parameter name.
    #[must_use]
    pub fn from_file(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Self::attribute_style(BagId::Files)
        }
    }

    /// Bare value-bag descriptor: no flags, never throws.
    #[must_use]
    pub fn bag(bag: BagId) -> Self {
        Self {
            options: Some(FilterOptions::default()),
            throw_on_failure: Some(false),
            ..Self::attribute_style(bag)
        }
    }

    /// Creates an attribute-style descriptor from a bag name such as
    /// `"query"` or `"request"`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming `parameter` if the bag is unknown.
    pub fn from_bag_name(bag: &str, parameter: &str) -> ResolveResult<Self> {
        let bag = bag
            .parse::<BagId>()
            .map_err(|e| ResolveError::configuration(parameter, e.to_string()))?;
        Ok(Self::attribute_style(bag))
    }

    /// Looks the value up under `name` instead of the parameter name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Selects the entire bag as a single map.
    #[must_use]
    pub fn wildcard(self) -> Self {
        self.renamed(WILDCARD)
    }

    /// Sets a scalar filter.
    #[must_use]
    pub fn with_filter(mut self, kind: FilterKind) -> Self {
        self.filter = Some(FilterSpec::Kind(kind));
        self
    }

    /// Sets a structural filter.
    #[must_use]
    pub fn with_structural(mut self, map: FilterMap) -> Self {
        self.filter = Some(FilterSpec::Structural(map));
        self
    }

    /// Replaces the options with bare flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FilterFlags) -> Self {
        self.options = Some(FilterOptions::from(flags));
        self
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: FilterOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets whether a filter failure fails the whole resolution.
    #[must_use]
    pub fn with_throw_on_failure(mut self, throw: bool) -> Self {
        self.throw_on_failure = Some(throw);
        self
    }

    /// Returns the bag.
    #[must_use]
    pub fn bag_id(&self) -> BagId {
        self.bag
    }

    /// Returns the explicit lookup name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the name looked up for a parameter called `parameter`.
    #[must_use]
    pub fn lookup_name<'a>(&'a self, parameter: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(parameter)
    }

    /// Whether the lookup name is the wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.name.as_deref() == Some(WILDCARD)
    }

    /// Returns the explicit filter, if any.
    #[must_use]
    pub fn filter(&self) -> Option<&FilterSpec> {
        self.filter.as_ref()
    }

    /// Returns the explicit options, if any.
    #[must_use]
    pub fn options(&self) -> Option<&FilterOptions> {
        self.options.as_ref()
    }

    /// Returns the options after applying `defaults`.
    #[must_use]
    pub fn effective_options(&self, defaults: &DescriptorDefaults) -> FilterOptions {
        self.options
            .clone()
            .unwrap_or_else(|| FilterOptions::from(defaults.flags))
    }

    /// Returns the throw flag after applying `defaults`.
    #[must_use]
    pub fn throws_on_failure(&self, defaults: &DescriptorDefaults) -> bool {
        self.throw_on_failure.unwrap_or(defaults.throw_on_failure)
    }
}
