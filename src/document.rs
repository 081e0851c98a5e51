//! JSON document parsing and normalization.
//!
//! Both sides of a comparison are parsed into a [`serde_json::Value`] and every
//! number is canonicalized to a double, so `1` and `1.0` compare equal. The
//! "new" side of a template comparison additionally receives the values of a
//! [`DefaultSet`] for any top-level key it omits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::SuppressError;

/// Parse a JSON text into a document with canonical numbers.
///
/// # Example
///
/// ```
/// use hemmer_elasticsearch_diff::document::parse_document;
///
/// let a = parse_document("[1, 2.0]").unwrap();
/// let b = parse_document("[1.0, 2]").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_document("{invalid").is_err());
/// ```
pub fn parse_document(text: &str) -> Result<Value, SuppressError> {
    let mut value: Value = serde_json::from_str(text)?;
    canonicalize_numbers(&mut value);
    Ok(value)
}

/// Parse a JSON text that must be an object at the top level.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, SuppressError> {
    match parse_document(text)? {
        Value::Object(map) => Ok(map),
        other => Err(SuppressError::UnexpectedShape(format!(
            "expected object, got {}",
            value_type_name(&other)
        ))),
    }
}

/// Rewrite every number in `value` as an `f64`.
pub fn canonicalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(canonical) = n.as_f64().and_then(Number::from_f64) {
                *n = canonical;
            }
        },
        Value::Array(items) => items.iter_mut().for_each(canonicalize_numbers),
        Value::Object(map) => map.values_mut().for_each(canonicalize_numbers),
        Value::Null | Value::Bool(_) | Value::String(_) => {},
    }
}

/// Human readable name of a document's variant, for error messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A table of top-level keys and the values injected when they are absent.
///
/// Defaults are only ever applied to the newly supplied side of a comparison.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultSet {
    entries: Map<String, Value>,
}

impl DefaultSet {
    /// Create an empty default set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The defaults Elasticsearch fills in for index and data-stream templates:
    /// `order` is `0`, `settings`, `mappings` and `aliases` are empty objects.
    pub fn template() -> Self {
        Self::new()
            .with_default("order", Value::from(0))
            .with_default("settings", Value::Object(Map::new()))
            .with_default("mappings", Value::Object(Map::new()))
            .with_default("aliases", Value::Object(Map::new()))
    }

    /// Add or replace a default.
    pub fn with_default(mut self, key: impl Into<String>, mut value: Value) -> Self {
        canonicalize_numbers(&mut value);
        self.entries.insert(key.into(), value);
        self
    }

    /// Look up the default for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of defaults in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no defaults.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert every default whose key is missing from `document`.
    ///
    /// Keys already present are left untouched, even when their value is `null`.
    pub fn apply(&self, document: &mut Map<String, Value>) {
        for (key, default) in &self.entries {
            if !document.contains_key(key) {
                let mut value = default.clone();
                canonicalize_numbers(&mut value);
                document.insert(key.clone(), value);
            }
        }
    }
}
