//! Dotted-key flattening.
//!
//! Elasticsearch accepts `"index.number_of_shards": 1` and
//! `"index": {"number_of_shards": 1}` interchangeably but always answers with
//! the nested form. Flattening rewrites the former into the latter so both can
//! be compared structurally.
//!
//! Keys are processed in ascending byte order. A dotted key that descends into
//! an existing object merges with it, and one that descends into a non-object
//! replaces it. Two objects landing on the same key are merged; any other
//! collision keeps the value written last in that order.

use serde_json::{Map, Value};
use tracing::trace;

/// Rewrite every dotted key of `data`, at every object depth, into nested objects.
///
/// Arrays and scalars are copied as-is; objects inside arrays are not visited.
///
/// # Example
///
/// ```
/// use hemmer_elasticsearch_diff::flatten::flatten_dotted_keys;
/// use serde_json::json;
///
/// let input = json!({"a.b.c": 1});
/// let flat = flatten_dotted_keys(input.as_object().unwrap());
/// assert_eq!(serde_json::Value::Object(flat), json!({"a": {"b": {"c": 1}}}));
/// ```
pub fn flatten_dotted_keys(data: &Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(&String, &Value)> = data.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut result = Map::new();
    for (key, value) in entries {
        let value = match value {
            Value::Object(nested) => Value::Object(flatten_dotted_keys(nested)),
            other => other.clone(),
        };
        insert_dotted(&mut result, key, value);
    }
    result
}

/// Insert `value` under `key`, creating one nested object per dot-separated
/// segment before the last.
fn insert_dotted(target: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => insert_leaf(target, key, value),
        Some((head, rest)) => {
            let slot = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                trace!(key = head, "dotted key replaces a non-object value");
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert_dotted(child, rest, value);
            }
        },
    }
}

fn insert_leaf(target: &mut Map<String, Value>, key: &str, value: Value) {
    match value {
        Value::Object(incoming) if target.get(key).is_some_and(Value::is_object) => {
            trace!(key, "merging colliding objects");
            if let Some(Value::Object(existing)) = target.get_mut(key) {
                for (k, v) in incoming {
                    insert_leaf(existing, &k, v);
                }
            }
        },
        value => {
            if target.insert(key.to_string(), value).is_some() {
                trace!(key, "colliding key overwritten");
            }
        },
    }
}
