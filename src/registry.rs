//! Which attributes of which resource types are compared semantically.
//!
//! A [`SuppressRegistry`] maps resource type names to [`ResourceRules`], and
//! each rule set maps attribute paths to a [`SuppressKind`]. The built-in
//! registry covers every Elasticsearch resource type the provider manages.
//!
//! # Example
//!
//! ```
//! use hemmer_elasticsearch_diff::registry::SuppressRegistry;
//!
//! let registry = SuppressRegistry::elasticsearch();
//! assert!(registry.suppress_diff(
//!     "elasticsearch_watcher",
//!     "trigger",
//!     r#"{"schedule": {"interval": "1m"}}"#,
//!     r#"{ "schedule" : { "interval" : "1m" } }"#,
//!     "my-watch",
//! ));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, enabled, Level};

use crate::config::SuppressConfig;
use crate::error::SuppressError;
use crate::suppress::SuppressKind;
use crate::types::SuppressContext;

/// The resource types managed by the Elasticsearch provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Index lifecycle management policy.
    IndexLifecyclePolicy,
    /// Legacy index template.
    IndexTemplate,
    /// Security role.
    Role,
    /// Security role mapping.
    RoleMapping,
    /// Native realm user.
    User,
    /// Cluster license.
    License,
    /// Snapshot repository.
    SnapshotRepository,
    /// Snapshot lifecycle management policy.
    SnapshotLifecyclePolicy,
    /// Watcher watch.
    Watcher,
    /// Data-stream index template.
    DataStreamTemplate,
    /// Ingest pipeline.
    IngestPipeline,
}

impl ResourceKind {
    /// Every resource kind, in registration order.
    pub const ALL: [ResourceKind; 11] = [
        Self::IndexLifecyclePolicy,
        Self::IndexTemplate,
        Self::Role,
        Self::RoleMapping,
        Self::User,
        Self::License,
        Self::SnapshotRepository,
        Self::SnapshotLifecyclePolicy,
        Self::Watcher,
        Self::DataStreamTemplate,
        Self::IngestPipeline,
    ];

    /// The resource type name used in configuration.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::IndexLifecyclePolicy => "elasticsearch_index_lifecycle_policy",
            Self::IndexTemplate => "elasticsearch_index_template",
            Self::Role => "elasticsearch_role",
            Self::RoleMapping => "elasticsearch_role_mapping",
            Self::User => "elasticsearch_user",
            Self::License => "elasticsearch_license",
            Self::SnapshotRepository => "elasticsearch_snapshot_repository",
            Self::SnapshotLifecyclePolicy => "elasticsearch_snapshot_lifecycle_policy",
            Self::Watcher => "elasticsearch_watcher",
            Self::DataStreamTemplate => "elasticsearch_xpack_data_stream_template",
            Self::IngestPipeline => "elasticsearch_ingest_pipeline",
        }
    }

    /// The semantically compared attributes of this resource type.
    pub fn rules(self) -> ResourceRules {
        use SuppressKind::*;

        let rules = ResourceRules::new();
        match self {
            Self::IndexLifecyclePolicy => rules.with_attribute("policy", EquivalentJson),
            Self::IndexTemplate => rules.with_attribute("template", IndexTemplate),
            Self::Role => rules
                .with_attribute("metadata", EquivalentJson)
                .with_attribute("indices.query", EquivalentJson)
                .with_attribute("indices.field_security", EquivalentJson),
            Self::RoleMapping => rules
                .with_attribute("rules", EquivalentJson)
                .with_attribute("metadata", EquivalentJson),
            Self::User => rules.with_attribute("metadata", EquivalentJson),
            Self::License => rules.with_attribute("license", License),
            Self::SnapshotRepository | Self::SnapshotLifecyclePolicy => rules,
            Self::Watcher => rules
                .with_attribute("trigger", EquivalentJson)
                .with_attribute("input", EquivalentJson)
                .with_attribute("condition", EquivalentJson)
                .with_attribute("actions", EquivalentJson)
                .with_attribute("metadata", EquivalentJson)
                .with_attribute("throttle_period", EquivalentJson),
            Self::DataStreamTemplate => rules.with_attribute("template", DataStreamTemplate),
            Self::IngestPipeline => rules.with_attribute("body", IngestPipeline),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceKind {
    type Err = SuppressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| SuppressError::UnknownResource(s.to_string()))
    }
}

/// Attribute path to suppressor bindings for one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceRules {
    attributes: HashMap<String, SuppressKind>,
}

impl ResourceRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an attribute path (dot-separated for nested blocks) to a suppressor.
    pub fn with_attribute(mut self, path: impl Into<String>, kind: SuppressKind) -> Self {
        self.attributes.insert(path.into(), kind);
        self
    }

    /// The suppressor bound to an attribute path.
    pub fn get(&self, path: &str) -> Option<SuppressKind> {
        self.attributes.get(path).copied()
    }

    /// Bound attribute paths, sorted.
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether no attribute is bound.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Normalize a diff key to an attribute path.
///
/// Diff engines address elements of nested lists and sets with numeric
/// segments (`indices.2841033.query`); those segments are dropped.
pub fn attribute_path(key: &str) -> String {
    key.split('.')
        .filter(|segment| segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Resource type to [`ResourceRules`] table, plus the configuration used to
/// build suppressors.
#[derive(Debug, Clone, Default)]
pub struct SuppressRegistry {
    config: SuppressConfig,
    resources: HashMap<String, ResourceRules>,
}

impl SuppressRegistry {
    /// Create an empty registry with the given configuration.
    pub fn new(config: SuppressConfig) -> Self {
        Self {
            config,
            resources: HashMap::new(),
        }
    }

    /// The built-in registry with default configuration.
    pub fn elasticsearch() -> Self {
        Self::elasticsearch_with_config(SuppressConfig::default())
    }

    /// The built-in registry with a custom configuration.
    pub fn elasticsearch_with_config(config: SuppressConfig) -> Self {
        ResourceKind::ALL
            .into_iter()
            .fold(Self::new(config), |registry, kind| {
                registry.with_resource(kind.type_name(), kind.rules())
            })
    }

    /// Register (or replace) the rules for a resource type.
    pub fn with_resource(mut self, resource_type: impl Into<String>, rules: ResourceRules) -> Self {
        self.resources.insert(resource_type.into(), rules);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SuppressConfig {
        &self.config
    }

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The rules registered for a resource type.
    pub fn rules(&self, resource_type: &str) -> Option<&ResourceRules> {
        self.resources.get(resource_type)
    }

    /// Resolve the suppressor kind for a diff key of a resource type.
    pub fn kind_for(&self, resource_type: &str, key: &str) -> Result<SuppressKind, SuppressError> {
        let rules = self
            .resources
            .get(resource_type)
            .ok_or_else(|| SuppressError::UnknownResource(resource_type.to_string()))?;
        let path = attribute_path(key);
        rules
            .get(&path)
            .ok_or_else(|| SuppressError::UnknownAttribute {
                resource: resource_type.to_string(),
                attribute: path,
            })
    }

    /// Decide whether the diff of `key` on resource `id` should be hidden,
    /// reporting lookup and input errors.
    pub fn try_suppress_diff(
        &self,
        resource_type: &str,
        key: &str,
        old: &str,
        new: &str,
        id: &str,
    ) -> Result<bool, SuppressError> {
        let suppressor = self.kind_for(resource_type, key)?.suppressor(&self.config);
        let ctx = SuppressContext::new(key, id);
        let equivalent = suppressor.compare(old, new, &ctx)?;

        if !equivalent && self.config.explain_differences && enabled!(Level::DEBUG) {
            if let Ok(Some(difference)) = suppressor.explain(old, new, &ctx) {
                debug!(resource_type, key, id, %difference, "keeping diff");
            }
        }
        Ok(equivalent)
    }

    /// Decide whether the diff of `key` on resource `id` should be hidden.
    ///
    /// Unknown resource types and attributes, like unreadable input, are never
    /// suppressed.
    pub fn suppress_diff(
        &self,
        resource_type: &str,
        key: &str,
        old: &str,
        new: &str,
        id: &str,
    ) -> bool {
        self.try_suppress_diff(resource_type, key, old, new, id)
            .unwrap_or_else(|err| {
                debug!(resource_type, key, id, error = %err, "not suppressing diff");
                false
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DefaultSet;

    #[test]
    fn test_resource_kind_names_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.type_name().parse::<ResourceKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.type_name());
        }
        assert!(matches!(
            "elasticsearch_index".parse::<ResourceKind>(),
            Err(SuppressError::UnknownResource(_))
        ));
    }

    #[test]
    fn test_builtin_registry_covers_all_kinds() {
        let registry = SuppressRegistry::elasticsearch();
        assert_eq!(registry.resource_types().len(), 11);
        assert!(registry
            .rules("elasticsearch_snapshot_repository")
            .unwrap()
            .is_empty());
        assert_eq!(
            registry.rules("elasticsearch_role").unwrap().attributes(),
            vec!["indices.field_security", "indices.query", "metadata"]
        );
    }

    #[test]
    fn test_attribute_path() {
        assert_eq!(attribute_path("template"), "template");
        assert_eq!(attribute_path("indices.2841033.query"), "indices.query");
        assert_eq!(attribute_path("indices.0.field_security"), "indices.field_security");
        assert_eq!(attribute_path("a.b1.c"), "a.b1.c");
    }

    #[test]
    fn test_kind_for() {
        let registry = SuppressRegistry::elasticsearch();
        assert_eq!(
            registry
                .kind_for("elasticsearch_index_template", "template")
                .unwrap(),
            SuppressKind::IndexTemplate
        );
        assert_eq!(
            registry
                .kind_for("elasticsearch_role", "indices.12.query")
                .unwrap(),
            SuppressKind::EquivalentJson
        );

        let err = registry
            .kind_for("elasticsearch_role", "cluster")
            .unwrap_err();
        let unknown_cluster = matches!(
            err,
            SuppressError::UnknownAttribute { ref attribute, .. } if attribute == "cluster"
        );
        assert!(unknown_cluster);

        let err = registry.kind_for("elasticsearch_nope", "x").unwrap_err();
        assert!(matches!(err, SuppressError::UnknownResource(_)));
    }

    #[test]
    fn test_suppress_diff_index_template() {
        let registry = SuppressRegistry::elasticsearch();
        let old = r#"{"logs": {"order": 0, "index_patterns": ["logs-*"], "settings": {"index": {"number_of_shards": "1"}}, "mappings": {}, "aliases": {}}}"#;
        let new = r#"{"index_patterns": ["logs-*"], "settings": {"index.number_of_shards": "1"}}"#;
        assert!(registry.suppress_diff("elasticsearch_index_template", "template", old, new, "logs"));
        assert!(!registry.suppress_diff("elasticsearch_index_template", "template", old, new, "other"));
    }

    #[test]
    fn test_suppress_diff_nested_role_query() {
        let registry = SuppressRegistry::elasticsearch();
        assert!(registry.suppress_diff(
            "elasticsearch_role",
            "indices.3012.query",
            r#"{"match": {"team": "a"}}"#,
            r#"{ "match": { "team": "a" } }"#,
            "reader",
        ));
    }

    #[test]
    fn test_suppress_diff_license() {
        let registry = SuppressRegistry::elasticsearch();
        assert!(registry.suppress_diff(
            "elasticsearch_license",
            "license",
            r#"{"uid":"x","type":"platinum","signature":"A"}"#,
            r#"{"license":{"uid":"x","type":"platinum","signature":"B"}}"#,
            "license",
        ));
    }

    #[test]
    fn test_unknown_bindings_are_not_suppressed() {
        let registry = SuppressRegistry::elasticsearch();
        assert!(!registry.suppress_diff("elasticsearch_role", "cluster", "{}", "{}", "r"));
        assert!(!registry.suppress_diff("elasticsearch_nope", "body", "{}", "{}", "r"));
        assert!(registry
            .try_suppress_diff("elasticsearch_role", "cluster", "{}", "{}", "r")
            .is_err());
    }

    #[test]
    fn test_custom_registry_uses_config() {
        let config = crate::config::SuppressConfig::default()
            .with_index_template_defaults(DefaultSet::new());
        let registry = SuppressRegistry::new(config).with_resource(
            "custom_template",
            ResourceRules::new().with_attribute("body", SuppressKind::IndexTemplate),
        );
        assert_eq!(registry.resource_types(), vec!["custom_template"]);
        assert!(registry.suppress_diff("custom_template", "body", r#"{"t": {}}"#, "{}", "t"));
        assert!(!SuppressRegistry::elasticsearch().suppress_diff(
            "elasticsearch_index_template",
            "template",
            r#"{"t": {}}"#,
            "{}",
            "t"
        ));
    }
}
