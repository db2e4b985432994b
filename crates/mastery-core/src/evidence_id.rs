use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest as Sha2Digest, Sha256};

/// Domain separator for evidence ID computation: `b"mastery:evidence:v1\0"`.
const EVIDENCE_DOMAIN_SEPARATOR: &[u8] = b"mastery:evidence:v1\0";

/// Prefix carried by every evidence ID.
pub const EVIDENCE_ID_PREFIX: &str = "ev_";

/// Content-derived identifier of an evidence record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceId(String);

impl EvidenceId {
    /// Wraps an existing identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the evidence ID for a record.
///
/// Formula: `"ev_" || base64url(sha256(domain_separator || json(record)))`
///
/// The `evidence_id` field is removed before hashing so a sealed record can be
/// re-verified. `serde_json` maps keep their keys sorted, so the encoding is stable.
pub fn compute_evidence_id<T: Serialize>(record: &T) -> Result<EvidenceId, EvidenceIdError> {
    let mut value: Value =
        serde_json::to_value(record).map_err(|e| EvidenceIdError::Serialization(e.to_string()))?;

    match &mut value {
        Value::Object(map) => {
            map.remove("evidence_id");
        }
        _ => return Err(EvidenceIdError::NotAnObject),
    }

    let bytes =
        serde_json::to_vec(&value).map_err(|e| EvidenceIdError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(EVIDENCE_DOMAIN_SEPARATOR);
    hasher.update(&bytes);
    let hash_bytes = hasher.finalize();

    use base64::Engine;
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash_bytes);
    Ok(EvidenceId(format!("{EVIDENCE_ID_PREFIX}{b64}")))
}

/// Error during evidence ID computation.
#[derive(thiserror::Error, Debug)]
pub enum EvidenceIdError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// The record did not serialize to a JSON object.
    #[error("evidence record must serialize to a JSON object")]
    NotAnObject,
}
