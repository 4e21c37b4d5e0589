//! Query string and URL-encoded form parsing.
//!
//! Keys may use bracket syntax to build nested values:
//!
//! | Input | Result |
//! |-------|--------|
//! | `a=1&a=2` | `a: "2"` (last value wins) |
//! | `a[]=1&a[]=2` | `a: ["1", "2"]` |
//! | `a[0]=1&a[1]=2` | `a: ["1", "2"]` |
//! | `a[x]=1&a[y]=2` | `a: {x: "1", y: "2"}` |
//! | `a[x][]=1` | `a: {x: ["1"]}` |

use tessera_core::{BagId, Value, ValueMap};
use tracing::debug;

use crate::{ExtractionError, ParameterBag};

/// Parses a query string (without the leading `?`) into a bag.
///
/// # Errors
///
/// Returns [`ExtractionError`] if the string is not valid URL encoding.
///
/// # Example
///
/// ```rust
/// use tessera_core::Value;
/// use tessera_extract::parse_query;
///
/// let bag = parse_query("page=2&tags[]=a&tags[]=b").unwrap();
/// assert_eq!(bag.get("page"), Some(&Value::from("2")));
/// assert_eq!(
///     bag.get("tags"),
///     Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
/// );
/// ```
pub fn parse_query(query: &str) -> Result<ParameterBag, ExtractionError> {
    parse_urlencoded(query, BagId::Query)
}

pub(crate) fn parse_urlencoded(input: &str, bag: BagId) -> Result<ParameterBag, ExtractionError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(input).map_err(|e| ExtractionError::malformed(bag, e.to_string()))?;

    let mut root = ValueMap::new();
    for (key, value) in pairs {
        insert_pair(&mut root, &key, Value::String(value));
    }

    Ok(ParameterBag::from(root))
}

/// Deepest bracket path accepted in a key. Deeper keys are dropped.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Stores `value` under a possibly bracketed `key`.
pub(crate) fn insert_pair(root: &mut ValueMap, key: &str, value: Value) {
    let Some((base, path)) = split_key(key) else {
        debug!(max_depth = MAX_NESTING_DEPTH, "dropping over-nested parameter");
        return;
    };
    if base.is_empty() {
        return;
    }

    let mut slot = root.entry(base.to_string()).or_insert(Value::Null);
    for segment in path {
        slot = if segment.is_empty() {
            append_slot(slot)
        } else {
            keyed_slot(slot, segment)
        };
    }
    *slot = value;
}

/// Splits `a[b][]` into `("a", ["b", ""])`. Keys with unbalanced brackets are
/// kept whole; keys nested deeper than [`MAX_NESTING_DEPTH`] yield `None`.
fn split_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let Some(open) = key.find('[') else {
        return Some((key, Vec::new()));
    };

    let base = &key[..open];
    let mut segments = Vec::new();
    let mut rest = &key[open..];

    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return Some((key, Vec::new()));
        };
        if segments.len() == MAX_NESTING_DEPTH {
            return None;
        }
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }

    if !rest.is_empty() {
        return Some((key, Vec::new()));
    }

    Some((base, segments))
}

/// Returns a fresh slot appended to the list (or map) at `slot`.
fn append_slot(slot: &mut Value) -> &mut Value {
    match slot {
        Value::List(items) => {
            items.push(Value::Null);
            let last = items.len() - 1;
            &mut items[last]
        }
        Value::Map(map) => {
            let key = next_index(map).to_string();
            map.entry(key).or_insert(Value::Null)
        }
        other => {
            *other = Value::List(Vec::new());
            append_slot(other)
        }
    }
}

/// Returns the slot stored under `key`, turning lists into maps when the key
/// does not continue the 0-indexed sequence.
fn keyed_slot<'a>(slot: &'a mut Value, key: &str) -> &'a mut Value {
    let index = key.parse::<usize>().ok().filter(|i| i.to_string() == key);

    let fits_list = match &*slot {
        Value::List(items) => index.is_some_and(|i| i <= items.len()),
        Value::Map(_) => false,
        _ => index == Some(0),
    };

    if !fits_list && !matches!(slot, Value::Map(_)) {
        let map = match std::mem::replace(slot, Value::Null) {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => ValueMap::new(),
        };
        *slot = Value::Map(map);
    }

    match slot {
        Value::List(items) => {
            let i = index.unwrap_or(items.len());
            if i == items.len() {
                items.push(Value::Null);
            }
            &mut items[i]
        }
        Value::Map(map) => map.entry(key.to_string()).or_insert(Value::Null),
        other => {
            *other = Value::List(Vec::new());
            keyed_slot(other, key)
        }
    }
}

fn next_index(map: &ValueMap) -> usize {
    map.keys()
        .filter_map(|k| k.parse::<usize>().ok())
        .max()
        .map_or(0, |max| max + 1)
}
