//! Error types for engine operations.

use mastery_core::{ConfigError, ValidationError};
use mastery_store::StoreError;
use thiserror::Error;

/// Errors that can occur during engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The backing store failed, or a status write lost a race.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A caller-supplied value was rejected.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    /// The engine configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// A thread panicked while holding the shared engine.
    #[error("engine lock poisoned")]
    Poisoned,
}

impl EngineError {
    /// True when the error is an optimistic-concurrency rejection worth retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Store(StoreError::Conflict { .. }))
    }
}
