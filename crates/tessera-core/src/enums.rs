//! Enumeration descriptors.
//!
//! Handlers and the serializer work with enumerations through an
//! [`EnumDescriptor`]: the enum's name and its ordered cases, each optionally
//! carrying a backing value. A resolved case is an [`EnumValue`].

use std::fmt;

/// Backing value of a backed enumeration case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Backing {
    /// Integer-backed case.
    Int(i64),
    /// String-backed case.
    String(String),
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

/// One declared case of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumCase {
    name: String,
    backing: Option<Backing>,
}

impl EnumCase {
    /// Returns the case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the backing value, if the enumeration is backed.
    #[must_use]
    pub fn backing(&self) -> Option<&Backing> {
        self.backing.as_ref()
    }
}

/// Describes an enumeration type and its cases.
///
/// # Example
///
/// ```
/// use tessera_core::{Backing, EnumDescriptor};
///
/// let suit = EnumDescriptor::backed_str("Suit", [("Hearts", "H"), ("Spades", "S")]);
/// assert!(suit.is_backed());
///
/// let hearts = suit.from_backing(&Backing::String("H".into())).unwrap();
/// assert_eq!(hearts.case_name(), "Hearts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDescriptor {
    name: String,
    cases: Vec<EnumCase>,
}

impl EnumDescriptor {
    /// Describes a non-backed enumeration.
    pub fn unit<I, S>(name: impl Into<String>, cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            cases: cases
                .into_iter()
                .map(|case| EnumCase {
                    name: case.into(),
                    backing: None,
                })
                .collect(),
        }
    }

    /// Describes a string-backed enumeration.
    pub fn backed_str<I, N, B>(name: impl Into<String>, cases: I) -> Self
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: Into<String>,
    {
        Self {
            name: name.into(),
            cases: cases
                .into_iter()
                .map(|(case, backing)| EnumCase {
                    name: case.into(),
                    backing: Some(Backing::String(backing.into())),
                })
                .collect(),
        }
    }

    /// Describes an integer-backed enumeration.
    pub fn backed_int<I, N>(name: impl Into<String>, cases: I) -> Self
    where
        I: IntoIterator<Item = (N, i64)>,
        N: Into<String>,
    {
        Self {
            name: name.into(),
            cases: cases
                .into_iter()
                .map(|(case, backing)| EnumCase {
                    name: case.into(),
                    backing: Some(Backing::Int(backing)),
                })
                .collect(),
        }
    }

    /// Returns the enumeration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared cases in order.
    #[must_use]
    pub fn cases(&self) -> &[EnumCase] {
        &self.cases
    }

    /// Whether the cases carry backing values.
    #[must_use]
    pub fn is_backed(&self) -> bool {
        self.cases.iter().any(|case| case.backing.is_some())
    }

    /// Looks up a case by its name.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<EnumValue> {
        self.cases
            .iter()
            .find(|case| case.name == name)
            .map(|case| self.value_of(case))
    }

    /// Looks up a case by its backing value.
    #[must_use]
    pub fn from_backing(&self, backing: &Backing) -> Option<EnumValue> {
        self.cases
            .iter()
            .find(|case| case.backing.as_ref() == Some(backing))
            .map(|case| self.value_of(case))
    }

    fn value_of(&self, case: &EnumCase) -> EnumValue {
        EnumValue {
            enum_name: self.name.clone(),
            case: case.clone(),
        }
    }
}

/// A resolved enumeration case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    enum_name: String,
    case: EnumCase,
}

impl EnumValue {
    /// Returns the name of the enumeration this case belongs to.
    #[must_use]
    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    /// Returns the case name.
    #[must_use]
    pub fn case_name(&self) -> &str {
        &self.case.name
    }

    /// Returns the backing value, if any.
    #[must_use]
    pub fn backing(&self) -> Option<&Backing> {
        self.case.backing.as_ref()
    }

    /// Whether this case belongs to a backed enumeration.
    #[must_use]
    pub fn is_backed(&self) -> bool {
        self.case.backing.is_some()
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.enum_name, self.case.name)
    }
}
