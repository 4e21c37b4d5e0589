//! Header bag construction.

use http::HeaderMap;

use crate::ParameterBag;

/// Builds the header bag from request headers.
///
/// Names are stored lowercased. A header sent several times is represented by
/// its first value. Values that are not visible ASCII are skipped.
///
/// # Example
///
/// ```rust
/// use http::HeaderMap;
/// use tessera_core::Value;
/// use tessera_extract::header_bag;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "10.0.0.1".parse().unwrap());
///
/// let bag = header_bag(&headers);
/// assert_eq!(bag.get("x_forwarded_for"), Some(&Value::from("10.0.0.1")));
/// ```
#[must_use]
pub fn header_bag(headers: &HeaderMap) -> ParameterBag {
    let mut bag = ParameterBag::headers();

    for name in headers.keys() {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            bag.set(name.as_str(), value);
        }
    }

    bag
}
