//! Diff suppressors for Elasticsearch resource attributes.
//!
//! A suppressor receives the old text (from state or the API) and the new text
//! (from configuration) of a JSON-valued attribute and decides whether they
//! describe the same document. Every failure to read either side counts as a
//! real difference: suppressing a genuine change is worse than showing a
//! spurious one.
//!
//! # Example
//!
//! ```
//! use hemmer_elasticsearch_diff::suppress::{suppress_index_template, suppress_license};
//!
//! let old = r#"{"tmpl1": {"order": 0, "settings": {"a": {"b": 1}}, "mappings": {}, "aliases": {}}}"#;
//! assert!(suppress_index_template(old, r#"{"settings": {"a.b": 1}}"#, "tmpl1"));
//! assert!(!suppress_index_template(old, r#"{"order": 1, "settings": {"a.b": 1}}"#, "tmpl1"));
//!
//! let old = r#"{"uid":"x","type":"basic","signature":"SIG1"}"#;
//! let new = r#"{"license": {"uid":"x","type":"basic","signature":"SIG2"}}"#;
//! assert!(suppress_license(old, new));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::compare::{equivalent, first_difference};
use crate::config::SuppressConfig;
use crate::document::{parse_document, parse_object, DefaultSet};
use crate::error::SuppressError;
use crate::flatten::flatten_dotted_keys;
use crate::license::{License, LicenseSpec};
use crate::types::{Difference, SuppressContext};

/// The comparison rule bound to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressKind {
    /// Legacy index template body, keyed by template name on the old side.
    IndexTemplate,
    /// Data-stream index template body, keyed by template name on the old side.
    DataStreamTemplate,
    /// Arbitrary JSON compared as-is.
    EquivalentJson,
    /// Ingest pipeline body, compared as-is.
    IngestPipeline,
    /// License spec against a license envelope, ignoring signatures.
    License,
}

impl SuppressKind {
    /// Build the suppressor for this kind using the given configuration.
    pub fn suppressor(self, config: &SuppressConfig) -> Suppressor {
        match self {
            Self::IndexTemplate => Suppressor::Template(config.index_template_defaults.clone()),
            Self::DataStreamTemplate => {
                Suppressor::Template(config.data_stream_template_defaults.clone())
            },
            Self::EquivalentJson | Self::IngestPipeline => Suppressor::EquivalentJson,
            Self::License => Suppressor::License,
        }
    }
}

/// A normalize-and-compare routine.
#[derive(Debug, Clone, PartialEq)]
pub enum Suppressor {
    /// Inject the defaults into the new side, flatten its dotted keys and
    /// compare it with the old side's entry named by the context id.
    Template(DefaultSet),
    /// Compare both sides as arbitrary JSON.
    EquivalentJson,
    /// Compare a bare license spec with an enveloped one, minus signatures.
    License,
}

impl Suppressor {
    /// Decide whether `old` and `new` are equivalent, reporting why they could
    /// not be compared.
    pub fn compare(
        &self,
        old: &str,
        new: &str,
        ctx: &SuppressContext<'_>,
    ) -> Result<bool, SuppressError> {
        match self {
            Self::Template(defaults) => {
                let (old, new) = template_pair(old, new, ctx.id, defaults)?;
                Ok(equivalent(&old, &new))
            },
            Self::EquivalentJson => {
                let (old, new) = json_pair(old, new)?;
                Ok(equivalent(&old, &new))
            },
            Self::License => {
                let (old, new) = license_pair(old, new)?;
                Ok(old == new)
            },
        }
    }

    /// Whether the diff between `old` and `new` should be hidden.
    ///
    /// Never fails: anything [`Suppressor::compare`] rejects is a difference.
    pub fn suppress(&self, old: &str, new: &str, ctx: &SuppressContext<'_>) -> bool {
        self.compare(old, new, ctx).unwrap_or_else(|err| {
            debug!(key = ctx.key, id = ctx.id, error = %err, "cannot compare, keeping diff");
            false
        })
    }

    /// Locate the first difference between the normalized sides.
    ///
    /// Returns `Ok(None)` when they are equivalent.
    pub fn explain(
        &self,
        old: &str,
        new: &str,
        ctx: &SuppressContext<'_>,
    ) -> Result<Option<Difference>, SuppressError> {
        let (old, new) = match self {
            Self::Template(defaults) => template_pair(old, new, ctx.id, defaults)?,
            Self::EquivalentJson => json_pair(old, new)?,
            Self::License => {
                let (old, new) = license_pair(old, new)?;
                (serde_json::to_value(old)?, serde_json::to_value(new)?)
            },
        };
        Ok(first_difference(&old, &new))
    }
}

fn template_pair(
    old: &str,
    new: &str,
    id: &str,
    defaults: &DefaultSet,
) -> Result<(Value, Value), SuppressError> {
    let mut old = parse_object(old)?;
    let mut new = parse_object(new)?;
    defaults.apply(&mut new);

    let old = old
        .remove(id)
        .ok_or_else(|| SuppressError::MissingKey(id.to_string()))?;
    Ok((old, Value::Object(flatten_dotted_keys(&new))))
}

fn json_pair(old: &str, new: &str) -> Result<(Value, Value), SuppressError> {
    Ok((parse_document(old)?, parse_document(new)?))
}

fn license_pair(old: &str, new: &str) -> Result<(LicenseSpec, LicenseSpec), SuppressError> {
    let old = LicenseSpec::from_json_str(old)?;
    let new = License::from_json_str(new)?.into_spec()?;
    Ok((old.without_signature(), new.without_signature()))
}

/// Compare an index template body against the API answer for template `id`.
pub fn suppress_index_template(old: &str, new: &str, id: &str) -> bool {
    Suppressor::Template(DefaultSet::template()).suppress(old, new, &SuppressContext::with_id(id))
}

/// Compare a data-stream template body against the API answer for template `id`.
pub fn suppress_data_stream_template(old: &str, new: &str, id: &str) -> bool {
    Suppressor::Template(DefaultSet::template()).suppress(old, new, &SuppressContext::with_id(id))
}

/// Compare two arbitrary JSON texts.
pub fn suppress_equivalent_json(old: &str, new: &str) -> bool {
    Suppressor::EquivalentJson.suppress(old, new, &SuppressContext::default())
}

/// Compare two ingest pipeline bodies.
pub fn suppress_ingest_pipeline(old: &str, new: &str) -> bool {
    suppress_equivalent_json(old, new)
}

/// Compare a stored license spec with an enveloped license, ignoring signatures.
pub fn suppress_license(old: &str, new: &str) -> bool {
    Suppressor::License.suppress(old, new, &SuppressContext::default())
}
