//! Convenience types shared by the comparison and suppression layers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The first point at which two documents disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    /// Dotted path to the differing value (`""` for the document root).
    ///
    /// Array elements are written as `[index]`.
    pub path: String,
    /// The value on the old side, `None` if the key only exists on the new side.
    pub before: Option<Value>,
    /// The value on the new side, `None` if the key only exists on the old side.
    pub after: Option<Value>,
}

impl Difference {
    /// Create a new difference.
    pub fn new(path: impl Into<String>, before: Option<Value>, after: Option<Value>) -> Self {
        Self {
            path: path.into(),
            before,
            after,
        }
    }

    /// A key present only on the new side.
    pub fn added(path: impl Into<String>, value: Value) -> Self {
        Self::new(path, None, Some(value))
    }

    /// A key present only on the old side.
    pub fn removed(path: impl Into<String>, value: Value) -> Self {
        Self::new(path, Some(value), None)
    }

    /// A value present on both sides with different content.
    pub fn modified(path: impl Into<String>, before: Value, after: Value) -> Self {
        Self::new(path, Some(before), Some(after))
    }
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            &self.path
        };
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => write!(f, "{}: {} -> {}", path, before, after),
            (None, Some(after)) => write!(f, "{}: added {}", path, after),
            (Some(before), None) => write!(f, "{}: removed {}", path, before),
            (None, None) => write!(f, "{}: unchanged", path),
        }
    }
}

/// Per-call information handed to a suppressor alongside the two texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuppressContext<'a> {
    /// The attribute key being diffed, as reported by the diff engine.
    pub key: &'a str,
    /// The identifier of the resource instance (the template name for templates).
    pub id: &'a str,
}

impl<'a> SuppressContext<'a> {
    /// Create a context for the given attribute key and resource identifier.
    pub fn new(key: &'a str, id: &'a str) -> Self {
        Self { key, id }
    }

    /// Create a context carrying only a resource identifier.
    pub fn with_id(id: &'a str) -> Self {
        Self { key: "", id }
    }
}
