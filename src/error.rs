//! Error types for diff suppression.
//!
//! The public suppression predicates never return these errors: every failure
//! collapses to "not equivalent". They exist so the fallible comparison paths
//! can be inspected and tested directly.

use thiserror::Error;

/// Errors that can occur while normalizing or comparing two documents.
#[derive(Debug, Error)]
pub enum SuppressError {
    /// One side is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The document parsed but does not have the shape the adapter expects.
    #[error("Unexpected shape: {0}")]
    UnexpectedShape(String),

    /// A key required to select the compared sub-document is absent.
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// The resource type has no registered suppression rules.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// The attribute has no registered suppressor on this resource type.
    #[error("Unknown attribute '{attribute}' on resource type '{resource}'")]
    UnknownAttribute {
        /// The resource type name.
        resource: String,
        /// The normalized attribute path.
        attribute: String,
    },

    /// The suppression configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SuppressError {
    /// Get the error message as a string.
    ///
    /// Returns the variant payload without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidJson(_err) => "invalid JSON (see Debug output)",
            Self::UnexpectedShape(msg) => msg,
            Self::MissingKey(key) => key,
            Self::UnknownResource(name) => name,
            Self::UnknownAttribute { attribute, .. } => attribute,
            Self::Configuration(msg) => msg,
        }
    }

    /// Whether this error was caused by the compared input rather than by
    /// the registry or configuration.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidJson(_) | Self::UnexpectedShape(_) | Self::MissingKey(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SuppressError::MissingKey("tmpl1".to_string());
        assert_eq!(format!("{}", err), "Missing key: tmpl1");

        let err = SuppressError::UnexpectedShape("expected object".to_string());
        assert_eq!(format!("{}", err), "Unexpected shape: expected object");

        let err = SuppressError::UnknownAttribute {
            resource: "elasticsearch_role".to_string(),
            attribute: "cluster".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Unknown attribute 'cluster' on resource type 'elasticsearch_role'"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: SuppressError = parse_err.into();
        assert!(matches!(err, SuppressError::InvalidJson(_)));
        assert!(format!("{}", err).starts_with("Invalid JSON: "));
    }

    #[test]
    fn test_message_method() {
        let err = SuppressError::UnknownResource("elasticsearch_foo".to_string());
        assert_eq!(err.message(), "elasticsearch_foo");

        let err = SuppressError::Configuration("bad defaults".to_string());
        assert_eq!(err.message(), "bad defaults");
    }

    #[test]
    fn test_is_malformed_input() {
        assert!(SuppressError::MissingKey("license".to_string()).is_malformed_input());
        assert!(SuppressError::UnexpectedShape("array".to_string()).is_malformed_input());
        assert!(!SuppressError::UnknownResource("x".to_string()).is_malformed_input());
        assert!(!SuppressError::Configuration("x".to_string()).is_malformed_input());
    }
}
