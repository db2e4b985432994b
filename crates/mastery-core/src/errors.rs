use thiserror::Error;

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Evidence ID computation failed.
    #[error("evidence ID computation failed: {0}")]
    EvidenceId(#[from] crate::evidence_id::EvidenceIdError),
    /// Invalid identifier or value.
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}
