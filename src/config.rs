//! Suppression configuration.
//!
//! The defaults injected into template documents are data, not code: they
//! live in a [`SuppressConfig`] that can be overridden from JSON.
//!
//! # Example
//!
//! ```
//! use hemmer_elasticsearch_diff::config::SuppressConfig;
//!
//! let config = SuppressConfig::from_json_str(r#"{"explain_differences": false}"#).unwrap();
//! assert!(!config.explain_differences);
//! assert_eq!(config.index_template_defaults.len(), 4);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document::DefaultSet;
use crate::error::SuppressError;

/// Environment variable holding a JSON-encoded [`SuppressConfig`].
pub const CONFIG_ENV_VAR: &str = "ELASTICSEARCH_DIFF_SUPPRESS_CONFIG";

/// Settings shared by every suppressor built from a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuppressConfig {
    /// Defaults injected into `elasticsearch_index_template` bodies.
    pub index_template_defaults: DefaultSet,
    /// Defaults injected into `elasticsearch_xpack_data_stream_template` bodies.
    pub data_stream_template_defaults: DefaultSet,
    /// Log the first differing path at debug level when a diff is kept.
    pub explain_differences: bool,
}

impl Default for SuppressConfig {
    fn default() -> Self {
        Self {
            index_template_defaults: DefaultSet::template(),
            data_stream_template_defaults: DefaultSet::template(),
            explain_differences: true,
        }
    }
}

impl SuppressConfig {
    /// Build a configuration from a JSON value. Absent fields keep their defaults.
    pub fn from_value(value: Value) -> Result<Self, SuppressError> {
        if !value.is_object() {
            return Err(SuppressError::Configuration(
                "configuration must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| SuppressError::Configuration(e.to_string()))
    }

    /// Build a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SuppressError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| SuppressError::Configuration(e.to_string()))?;
        Self::from_value(value)
    }

    /// Read the configuration from [`CONFIG_ENV_VAR`], falling back to the
    /// defaults when it is unset or empty.
    pub fn from_env() -> Result<Self, SuppressError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(var = CONFIG_ENV_VAR, "loading suppression config from environment");
                Self::from_json_str(&text)
            },
            _ => Ok(Self::default()),
        }
    }

    /// Replace the index template defaults.
    pub fn with_index_template_defaults(mut self, defaults: DefaultSet) -> Self {
        self.index_template_defaults = defaults;
        self
    }

    /// Replace the data-stream template defaults.
    pub fn with_data_stream_template_defaults(mut self, defaults: DefaultSet) -> Self {
        self.data_stream_template_defaults = defaults;
        self
    }

    /// Enable or disable difference explanations.
    pub fn with_explain_differences(mut self, explain: bool) -> Self {
        self.explain_differences = explain;
        self
    }
}
