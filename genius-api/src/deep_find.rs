//! Recursive key search over nested JSON.
//!
//! Genius responses nest the same field names at many depths (`id`, `url`,
//! `title` appear on songs, artists, users, ...). [`deep_find`] collects every
//! value stored under a key anywhere in a document:
//!
//! ```
//! use genius_api::deep_find::{deep_find, Found};
//! use serde_json::json;
//!
//! let doc = json!({ "a": "b", "c": { "a": "b" } });
//! assert_eq!(deep_find(&doc, "a", true), Found::One(json!("b")));
//! assert_eq!(
//!     deep_find(&doc, "a", false),
//!     Found::Many(vec![json!("b"), json!("b")]),
//! );
//! ```
//!
//! Only objects are looked up. Arrays are traversed (their object elements
//! are searched) but never matched themselves. `null` values and empty arrays
//! stored under the key count as "nothing there" and are skipped.

use serde_json::Value;

/// Outcome of a [`deep_find`] search.
#[derive(Debug, Clone, PartialEq)]
pub enum Found {
    /// The key does not occur anywhere.
    Nothing,
    /// Exactly one value (after de-duplication).
    One(Value),
    /// Two or more values, in first-seen order.
    Many(Vec<Value>),
}

impl Found {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Collapse into a single JSON value: `Nothing` becomes `[]`, `One` is
    /// unwrapped, `Many` becomes an array.
    pub fn into_value(self) -> Value {
        match self {
            Self::Nothing => Value::Array(Vec::new()),
            Self::One(v) => v,
            Self::Many(vs) => Value::Array(vs),
        }
    }

    /// All found values as a list, regardless of count.
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Self::Nothing => Vec::new(),
            Self::One(v) => vec![v],
            Self::Many(vs) => vs,
        }
    }
}

/// Find every value stored under `key` in `container`.
///
/// With `unique`, equal values are reported once, keeping the first
/// occurrence's position. `container` is never modified.
pub fn deep_find(container: &Value, key: &str, unique: bool) -> Found {
    let mut hits = Vec::new();
    collect(container, key, &mut hits);

    let mut out: Vec<Value> = Vec::with_capacity(hits.len());
    for hit in hits {
        if unique && out.contains(hit) {
            continue;
        }
        out.push(hit.clone());
    }

    match out.len() {
        0 => Found::Nothing,
        1 => Found::One(out.remove(0)),
        _ => Found::Many(out),
    }
}

fn collect<'a>(container: &'a Value, key: &str, hits: &mut Vec<&'a Value>) {
    let Value::Object(map) = container else {
        return;
    };

    if let Some(v) = map.get(key).filter(|v| !is_blank(v)) {
        hits.push(v);
    }

    for value in map.values() {
        match value {
            Value::Object(_) => collect(value, key, hits),
            Value::Array(items) => {
                for item in items.iter().filter(|i| i.is_object()) {
                    collect(item, key, hits);
                }
            }
            _ => {}
        }
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Extension methods mirroring [`deep_find`] on a JSON value.
pub trait DeepFind {
    /// De-duplicated search, see [`deep_find`].
    fn deep_find(&self, key: &str) -> Found;

    /// Search keeping duplicates.
    fn deep_find_all(&self, key: &str) -> Found;
}

impl DeepFind for Value {
    fn deep_find(&self, key: &str) -> Found {
        deep_find(self, key, true)
    }

    fn deep_find_all(&self, key: &str) -> Found {
        deep_find(self, key, false)
    }
}
