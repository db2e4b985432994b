//! Error types for store operations.

use mastery_core::{LearnerId, Level};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] mastery_journal::JournalError),
    /// Parse error while typing a ledger entry.
    #[error("parse error: {0}")]
    Parse(#[from] crate::entry::ParseError),
    /// Sealing an evidence record failed.
    #[error("core error: {0}")]
    Core(#[from] mastery_core::CoreError),
    /// A status write raced another writer for the same row.
    #[error("status for {learner_id} at level {level} changed concurrently (expected revision {expected}, found {found})")]
    Conflict {
        /// Learner of the contested row.
        learner_id: LearnerId,
        /// Level of the contested row.
        level: Level,
        /// Revision the writer based its change on.
        expected: u64,
        /// Revision currently stored.
        found: u64,
    },
    /// Other error.
    #[error("{0}")]
    Other(String),
}
