//! Testing utilities for suppression rules.
//!
//! This module lets resource implementations check their diff behavior
//! without a running diff engine.
//!
//! # Example
//!
//! ```
//! use hemmer_elasticsearch_diff::testing::SuppressTester;
//!
//! let tester = SuppressTester::elasticsearch();
//! tester.assert_suppressed(
//!     "elasticsearch_ingest_pipeline",
//!     "body",
//!     r#"{"processors": []}"#,
//!     r#"{ "processors" : [ ] }"#,
//!     "my-pipeline",
//! );
//! tester.assert_not_suppressed(
//!     "elasticsearch_ingest_pipeline",
//!     "body",
//!     r#"{"processors": []}"#,
//!     r#"{"processors": [{"set": {"field": "a", "value": 1}}]}"#,
//!     "my-pipeline",
//! );
//! ```

use serde_json::Value;

use crate::compare::{equivalent, first_difference};
use crate::config::SuppressConfig;
use crate::error::SuppressError;
use crate::registry::SuppressRegistry;
use crate::types::{Difference, SuppressContext};

/// A test harness around a [`SuppressRegistry`].
pub struct SuppressTester {
    registry: SuppressRegistry,
}

impl SuppressTester {
    /// Create a tester for the given registry.
    pub fn new(registry: SuppressRegistry) -> Self {
        Self { registry }
    }

    /// Create a tester for the built-in registry.
    pub fn elasticsearch() -> Self {
        Self::new(SuppressRegistry::elasticsearch())
    }

    /// Create a tester for the built-in registry with a custom configuration.
    pub fn with_config(config: SuppressConfig) -> Self {
        Self::new(SuppressRegistry::elasticsearch_with_config(config))
    }

    /// Get a reference to the underlying registry.
    pub fn registry(&self) -> &SuppressRegistry {
        &self.registry
    }

    /// Whether the registry hides the diff.
    pub fn suppresses(
        &self,
        resource_type: &str,
        key: &str,
        old: &str,
        new: &str,
        id: &str,
    ) -> bool {
        self.registry.suppress_diff(resource_type, key, old, new, id)
    }

    /// Run the fallible comparison, exposing why two sides could not be compared.
    pub fn compare(
        &self,
        resource_type: &str,
        key: &str,
        old: &str,
        new: &str,
        id: &str,
    ) -> Result<bool, SuppressError> {
        self.registry
            .try_suppress_diff(resource_type, key, old, new, id)
    }

    /// Explain the first difference the registry sees between two sides.
    pub fn explain(
        &self,
        resource_type: &str,
        key: &str,
        old: &str,
        new: &str,
        id: &str,
    ) -> Result<Option<Difference>, SuppressError> {
        let kind = self.registry.kind_for(resource_type, key)?;
        kind.suppressor(self.registry.config()).explain(
            old,
            new,
            &SuppressContext::new(key, id),
        )
    }

    /// Assert that the diff is hidden.
    ///
    /// # Panics
    ///
    /// Panics if the registry keeps the diff.
    pub fn assert_suppressed(
        &self,
        resource_type: &str,
        key: &str,
        old: &str,
        new: &str,
        id: &str,
    ) {
        if !self.suppresses(resource_type, key, old, new, id) {
            let reason = match self.explain(resource_type, key, old, new, id) {
                Ok(Some(difference)) => difference.to_string(),
                Ok(None) => "no difference found".to_string(),
                Err(err) => err.to_string(),
            };
            panic!(
                "Expected diff of '{}.{}' to be suppressed, but it was kept: {}",
                resource_type, key, reason
            );
        }
    }

    /// Assert that the diff is kept.
    ///
    /// # Panics
    ///
    /// Panics if the registry hides the diff.
    pub fn assert_not_suppressed(
        &self,
        resource_type: &str,
        key: &str,
        old: &str,
        new: &str,
        id: &str,
    ) {
        assert!(
            !self.suppresses(resource_type, key, old, new, id),
            "Expected diff of '{}.{}' to be kept, but it was suppressed",
            resource_type,
            key
        );
    }
}

/// Assert that two documents are equivalent.
///
/// # Panics
///
/// Panics with the first differing path if they are not.
pub fn assert_equivalent(old: &Value, new: &Value) {
    if let Some(difference) = first_difference(old, new) {
        panic!("Expected documents to be equivalent, but {}", difference);
    }
}

/// Assert that two documents are not equivalent.
///
/// # Panics
///
/// Panics if they are equivalent.
pub fn assert_not_equivalent(old: &Value, new: &Value) {
    assert!(
        !equivalent(old, new),
        "Expected documents to differ, but they are equivalent: {}",
        old
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DefaultSet;
    use serde_json::json;

    #[test]
    fn test_tester_watcher_fields() {
        let tester = SuppressTester::elasticsearch();
        for key in ["trigger", "input", "condition", "actions", "metadata"] {
            tester.assert_suppressed(
                "elasticsearch_watcher",
                key,
                r#"{"a": [1, 2], "b": {"c": null}}"#,
                r#"{"b": {"c": null}, "a": [1.0, 2]}"#,
                "watch",
            );
        }
        // A bare duration is not JSON, so it is always reported.
        tester.assert_not_suppressed(
            "elasticsearch_watcher",
            "throttle_period",
            "10s",
            "10s",
            "watch",
        );
    }

    #[test]
    fn test_tester_role_mapping_and_user() {
        let tester = SuppressTester::elasticsearch();
        tester.assert_suppressed(
            "elasticsearch_role_mapping",
            "rules",
            r#"{"field": {"username": "*"}}"#,
            r#"{"field":{"username":"*"}}"#,
            "mapping",
        );
        tester.assert_suppressed("elasticsearch_user", "metadata", "{}", " { } ", "alice");
        tester.assert_not_suppressed(
            "elasticsearch_user",
            "metadata",
            r#"{"team": "a"}"#,
            r#"{"team": "b"}"#,
            "alice",
        );
    }

    #[test]
    fn test_tester_lifecycle_policy() {
        let tester = SuppressTester::elasticsearch();
        tester.assert_suppressed(
            "elasticsearch_index_lifecycle_policy",
            "policy",
            r#"{"policy": {"phases": {"hot": {"actions": {"rollover": {"max_age": "1d"}}}}}}"#,
            r#"{"policy": {"phases": {"hot": {"actions": {"rollover": {"max_age": "1d"}}}}}}"#,
            "logs",
        );
    }

    #[test]
    fn test_tester_data_stream_template() {
        let tester = SuppressTester::elasticsearch();
        let old = r#"{"ds": {"order": 0, "index_patterns": ["ds-*"], "settings": {}, "mappings": {"_doc": {"properties": {}}}, "aliases": {}}}"#;
        tester.assert_suppressed(
            "elasticsearch_xpack_data_stream_template",
            "template",
            old,
            r#"{"index_patterns": ["ds-*"], "mappings": {"_doc.properties": {}}}"#,
            "ds",
        );
    }

    #[test]
    fn test_tester_explain() {
        let tester = SuppressTester::elasticsearch();
        let diff = tester
            .explain(
                "elasticsearch_index_template",
                "template",
                r#"{"t": {"order": 0, "settings": {}, "mappings": {}, "aliases": {}}}"#,
                r#"{"order": 3}"#,
                "t",
            )
            .unwrap()
            .unwrap();
        assert_eq!(diff, Difference::modified("order", json!(0.0), json!(3.0)));
    }

    #[test]
    fn test_tester_compare_reports_errors() {
        let tester = SuppressTester::elasticsearch();
        let err = tester
            .compare("elasticsearch_license", "license", "{}", "{}", "license")
            .unwrap_err();
        assert!(matches!(err, SuppressError::MissingKey(_)));
    }

    #[test]
    fn test_tester_with_config() {
        let config = SuppressConfig::default().with_index_template_defaults(DefaultSet::new());
        let tester = SuppressTester::with_config(config);
        tester.assert_suppressed(
            "elasticsearch_index_template",
            "template",
            r#"{"t": {}}"#,
            "{}",
            "t",
        );
        assert!(tester.registry().config().index_template_defaults.is_empty());
    }

    #[test]
    #[should_panic(expected = "to be suppressed")]
    fn test_assert_suppressed_fails() {
        SuppressTester::elasticsearch().assert_suppressed(
            "elasticsearch_ingest_pipeline",
            "body",
            "[1, 2]",
            "[2, 1]",
            "p",
        );
    }

    #[test]
    #[should_panic(expected = "to be kept")]
    fn test_assert_not_suppressed_fails() {
        SuppressTester::elasticsearch().assert_not_suppressed(
            "elasticsearch_ingest_pipeline",
            "body",
            "[1, 2]",
            "[1, 2]",
            "p",
        );
    }

    #[test]
    fn test_assert_equivalent() {
        assert_equivalent(&json!({"a": 1}), &json!({"a": 1.0}));
        assert_not_equivalent(&json!({"a": 1}), &json!({"a": 2}));
    }

    #[test]
    #[should_panic(expected = "a: 1 -> 2")]
    fn test_assert_equivalent_fails_with_path() {
        assert_equivalent(&json!({"a": 1}), &json!({"a": 2}));
    }
}
