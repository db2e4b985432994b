//! Pluggable storage for the mastery evidence ledger and verification status rows.
//!
//! This crate provides:
//! - `EvidenceLedger` and `StatusStore` traits (combined as `MasteryStore`)
//! - Typed ledger entries (`evidence`, `status`, `status_reset`)
//! - Evidence filtering for selective scans
//! - An in-memory backend and a journal-backed backend sharing one replay index
//!
//! Evidence is append-only. Status rows are stored as full snapshots; replay keeps
//! the last snapshot per (learner, level), and a `status_reset` entry removes one.

#![deny(missing_docs)]

/// Typed ledger entries.
pub mod entry;
/// Error types for store operations.
pub mod error;
/// Evidence filtering API.
pub mod filter;
/// Replay index shared by the backends.
pub mod index;
/// Journal-backed storage implementation.
pub mod journal;
/// In-memory storage implementation.
pub mod memory;
/// Storage backend traits.
pub mod traits;

pub use entry::{parse_entry, to_entry_json, LedgerEntry, ParseError, StatusReset};
pub use error::StoreError;
pub use filter::{
    AndFilter, DimensionFilter, EvidenceFilter, LearnerFilter, LevelFilter, PassedFilter,
    TimeRangeFilter,
};
pub use index::LedgerIndex;
pub use journal::JournalStore;
pub use mastery_journal::{ReadMode, WriteOptions};
pub use memory::MemoryStore;
pub use traits::{EvidenceLedger, MasteryStore, StatusStore};
