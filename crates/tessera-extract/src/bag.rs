//! Parameter bags.
//!
//! A [`ParameterBag`] is an ordered key to [`Value`] mapping over one section
//! of request data. Header bags normalize keys so that lookups are
//! case-insensitive and accept `_` in place of `-`.

use std::borrow::Cow;

use indexmap::IndexMap;
use tessera_core::{Value, ValueMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum KeyStyle {
    #[default]
    Exact,
    Header,
}

impl KeyStyle {
    fn normalize<'a>(self, key: &'a str) -> Cow<'a, str> {
        match self {
            Self::Exact => Cow::Borrowed(key),
            Self::Header => Cow::Owned(
                key.chars()
                    .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
                    .collect(),
            ),
        }
    }
}

/// Ordered collection of request parameters.
///
/// `get` distinguishes a missing key (`None`) from an explicit null
/// (`Some(&Value::Null)`).
///
/// # Example
///
/// ```rust
/// use tessera_core::Value;
/// use tessera_extract::ParameterBag;
///
/// let mut bag = ParameterBag::new();
/// bag.set("page", "2");
/// bag.set("filter", Value::Null);
///
/// assert!(bag.has("filter"));
/// assert_eq!(bag.get("filter"), Some(&Value::Null));
/// assert_eq!(bag.get("sort"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag {
    entries: ValueMap,
    style: KeyStyle,
}

impl ParameterBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bag whose keys follow header naming rules.
    #[must_use]
    pub fn headers() -> Self {
        Self {
            entries: ValueMap::new(),
            style: KeyStyle::Header,
        }
    }

    /// Returns `true` if the bag contains the key.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(self.style.normalize(key).as_ref())
    }

    /// Returns the value for the key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(self.style.normalize(key).as_ref())
    }

    /// Sets a value, replacing any previous one in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key: String = key.into();
        let key = if self.style == KeyStyle::Header {
            self.style.normalize(&key).into_owned()
        } else {
            key
        };
        self.entries.insert(key, value.into());
    }

    /// Removes a key, returning its value. Order of the remaining keys is
    /// preserved.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(self.style.normalize(key).as_ref())
    }

    /// Returns all entries.
    #[must_use]
    pub fn all(&self) -> &ValueMap {
        &self.entries
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the bag, returning its entries.
    #[must_use]
    pub fn into_inner(self) -> ValueMap {
        self.entries
    }

    /// Copies every entry of `other` into this bag, replacing existing keys.
    pub fn extend(&mut self, other: Self) {
        for (key, value) in other.entries {
            self.set(key, value);
        }
    }
}

impl From<ValueMap> for ParameterBag {
    fn from(entries: ValueMap) -> Self {
        Self {
            entries,
            style: KeyStyle::Exact,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries: IndexMap<String, Value> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from(entries)
    }
}
