//! Structural equivalence of JSON documents.
//!
//! Object key order is irrelevant; array element order is significant.
//! Numbers are compared as doubles, so `1` and `1.0` are equivalent even when
//! the inputs were not canonicalized by [`crate::document::parse_document`].

use serde_json::{Map, Value};

use crate::types::Difference;

/// Returns true if `old` and `new` are recursively identical.
///
/// # Example
///
/// ```
/// use hemmer_elasticsearch_diff::compare::equivalent;
/// use serde_json::json;
///
/// assert!(equivalent(&json!({"a": 1, "b": [1, 2]}), &json!({"b": [1, 2], "a": 1.0})));
/// assert!(!equivalent(&json!([1, 2]), &json!([2, 1])));
/// ```
pub fn equivalent(old: &Value, new: &Value) -> bool {
    match (old, new) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equivalent(x, y))
        },
        (Value::Object(a), Value::Object(b)) => objects_equivalent(a, b),
        _ => false,
    }
}

fn objects_equivalent(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| equivalent(value, other)))
}

/// Locate the first path at which `old` and `new` disagree.
///
/// Object keys are visited in sorted order so the reported path is stable.
/// Returns `None` when the documents are [`equivalent`].
pub fn first_difference(old: &Value, new: &Value) -> Option<Difference> {
    difference_at(String::new(), old, new)
}

fn difference_at(path: String, old: &Value, new: &Value) -> Option<Difference> {
    match (old, new) {
        (Value::Array(a), Value::Array(b)) if a.len() == b.len() => a
            .iter()
            .zip(b)
            .enumerate()
            .find_map(|(i, (x, y))| difference_at(format!("{}[{}]", path, i), x, y)),
        (Value::Object(a), Value::Object(b)) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort();
            keys.dedup();
            keys.into_iter().find_map(|key| {
                let child = join_path(&path, key);
                match (a.get(key), b.get(key)) {
                    (Some(x), Some(y)) => difference_at(child, x, y),
                    (Some(x), None) => Some(Difference::removed(child, x.clone())),
                    (None, Some(y)) => Some(Difference::added(child, y.clone())),
                    (None, None) => None,
                }
            })
        },
        _ if equivalent(old, new) => None,
        _ => Some(Difference::modified(path, old.clone(), new.clone())),
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
