//! The Elasticsearch license document.
//!
//! `GET _license` answers with `{"license": {...}}` while the state stores the
//! bare spec, so the license suppressor reads the two sides into different
//! shapes before comparing them field by field.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SuppressError;

/// Envelope key of the license API.
pub const LICENSE_KEY: &str = "license";

/// License type Elasticsearch reports for the free tier.
pub const BASIC_LICENSE_TYPE: &str = "basic";

/// A license specification.
///
/// Missing and `null` fields decode to their zero value and unknown fields are
/// ignored. Numeric fields are doubles, matching how the rest of the crate
/// represents JSON numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseSpec {
    /// Unique identifier of the license.
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    /// License type (`basic`, `trial`, `platinum`, ...).
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub license_type: String,
    /// Issue date, in epoch milliseconds.
    #[serde(deserialize_with = "null_as_default")]
    pub issue_date_in_millis: f64,
    /// Expiry date, in epoch milliseconds.
    #[serde(deserialize_with = "null_as_default")]
    pub expiry_date_in_millis: f64,
    /// Maximum number of nodes covered.
    #[serde(deserialize_with = "null_as_default")]
    pub max_nodes: f64,
    /// Licensee.
    #[serde(deserialize_with = "null_as_default")]
    pub issued_to: String,
    /// Issuer.
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: String,
    /// Cryptographic signature; regenerated by the cluster and never compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Start date, in epoch milliseconds.
    #[serde(deserialize_with = "null_as_default")]
    pub start_date_in_millis: f64,
}

/// Signed enterprise licenses carry `"max_nodes": null`; treat `null` like an
/// absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LicenseSpec {
    /// Decode a bare license spec.
    pub fn from_json_str(text: &str) -> Result<Self, SuppressError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode the spec the way it is stored in state.
    pub fn to_json_string(&self) -> Result<String, SuppressError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether this is the free basic license.
    pub fn is_basic(&self) -> bool {
        self.license_type == BASIC_LICENSE_TYPE
    }

    /// Return a copy with the signature cleared.
    pub fn without_signature(&self) -> Self {
        Self {
            signature: None,
            ..self.clone()
        }
    }
}

/// The `{"license": spec}` envelope returned by the license API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct License {
    entries: HashMap<String, LicenseSpec>,
}

impl License {
    /// Decode a license envelope.
    pub fn from_json_str(text: &str) -> Result<Self, SuppressError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Wrap a spec in an envelope.
    pub fn new(spec: LicenseSpec) -> Self {
        let mut entries = HashMap::new();
        entries.insert(LICENSE_KEY.to_string(), spec);
        Self { entries }
    }

    /// The wrapped spec, if the envelope has one.
    pub fn spec(&self) -> Option<&LicenseSpec> {
        self.entries.get(LICENSE_KEY)
    }

    /// Unwrap the spec, failing if the envelope has no `license` key.
    pub fn into_spec(mut self) -> Result<LicenseSpec, SuppressError> {
        self.entries
            .remove(LICENSE_KEY)
            .ok_or_else(|| SuppressError::MissingKey(LICENSE_KEY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let spec = LicenseSpec::from_json_str(r#"{"uid":"x","type":"basic"}"#).unwrap();
        assert_eq!(spec.uid, "x");
        assert!(spec.is_basic());
        assert_eq!(spec.max_nodes, 0.0);
        assert_eq!(spec.issuer, "");
        assert_eq!(spec.signature, None);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let spec =
            LicenseSpec::from_json_str(r#"{"uid":"x","status":"active","max_nodes":3}"#).unwrap();
        assert_eq!(spec.max_nodes, 3.0);
    }

    #[test]
    fn test_null_fields_default_to_zero() {
        let spec = LicenseSpec::from_json_str(
            r#"{"uid":null,"type":"enterprise","max_nodes":null,"issuer":null,"signature":null}"#,
        )
        .unwrap();
        assert_eq!(spec.uid, "");
        assert_eq!(spec.license_type, "enterprise");
        assert_eq!(spec.max_nodes, 0.0);
        assert_eq!(spec.issuer, "");
        assert_eq!(spec.signature, None);
    }

    #[test]
    fn test_wrong_field_type_fails() {
        let err = LicenseSpec::from_json_str(r#"{"uid": 5}"#).unwrap_err();
        assert!(matches!(err, SuppressError::InvalidJson(_)));
    }

    #[test]
    fn test_to_json_string_omits_empty_signature() {
        let spec = LicenseSpec {
            uid: "x".to_string(),
            license_type: "platinum".to_string(),
            ..Default::default()
        };
        let text = spec.to_json_string().unwrap();
        assert!(!text.contains("signature"));
        assert!(text.contains(r#""type":"platinum""#));
        assert_eq!(LicenseSpec::from_json_str(&text).unwrap(), spec);
    }

    #[test]
    fn test_without_signature() {
        let spec = LicenseSpec {
            signature: Some("SIG".to_string()),
            ..Default::default()
        };
        assert_eq!(spec.without_signature().signature, None);
    }

    #[test]
    fn test_envelope() {
        let license = License::from_json_str(r#"{"license": {"uid": "x"}}"#).unwrap();
        assert_eq!(license.spec().map(|s| s.uid.as_str()), Some("x"));
        assert_eq!(license.into_spec().unwrap().uid, "x");

        let empty = License::from_json_str("{}").unwrap();
        let err = empty.into_spec().unwrap_err();
        assert!(matches!(err, SuppressError::MissingKey(ref k) if k == "license"));

        let wrapped = License::new(LicenseSpec::default());
        assert!(wrapped.spec().is_some());
    }
}
