//! Hemmer Elasticsearch Diff
//!
//! Semantic diff suppression for the JSON-valued attributes of Elasticsearch
//! provider resources. Elasticsearch rewrites the documents it is given: it
//! fills in defaults, expands dotted setting names and reorders keys. Without
//! a semantic comparison every plan would propose updating index templates,
//! pipelines and licenses that have not changed.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **Normalization**: Parsing with canonical numbers and per-resource default injection
//! - **Flattening**: Rewriting `"a.b": 1` into `{"a": {"b": 1}}`
//! - **Comparison**: Structural equivalence and first-difference explanations
//! - **Suppressors**: Template, generic JSON, and license comparison rules
//! - **Registry**: The resource type / attribute / suppressor binding table
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```
//! use hemmer_elasticsearch_diff::SuppressRegistry;
//!
//! let registry = SuppressRegistry::elasticsearch();
//!
//! // State holds the API answer, keyed by template name.
//! let old = r#"{"logs": {"order": 0, "index_patterns": ["logs-*"],
//!     "settings": {"index": {"number_of_shards": "1"}}, "mappings": {}, "aliases": {}}}"#;
//! // Configuration holds the body the user wrote.
//! let new = r#"{"index_patterns": ["logs-*"], "settings": {"index.number_of_shards": "1"}}"#;
//!
//! assert!(registry.suppress_diff("elasticsearch_index_template", "template", old, new, "logs"));
//! ```
//!
//! # Failure Semantics
//!
//! Suppression predicates never fail. Input that cannot be parsed, or that
//! lacks the expected shape, is treated as a real difference so a change is
//! never hidden. The `try_`/`compare` variants expose the underlying
//! [`SuppressError`] for callers and tests that need it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod config;
pub mod document;
pub mod error;
pub mod flatten;
pub mod license;
pub mod logging;
pub mod registry;
pub mod suppress;
pub mod testing;
pub mod types;

// Re-export main types at crate root
pub use compare::{equivalent, first_difference};
pub use config::SuppressConfig;
pub use document::{parse_document, DefaultSet};
pub use error::SuppressError;
pub use flatten::flatten_dotted_keys;
pub use license::{License, LicenseSpec};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use registry::{ResourceKind, ResourceRules, SuppressRegistry};
pub use suppress::{
    suppress_data_stream_template, suppress_equivalent_json, suppress_index_template,
    suppress_ingest_pipeline, suppress_license, SuppressKind, Suppressor,
};
pub use types::{Difference, SuppressContext};

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
