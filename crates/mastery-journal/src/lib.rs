//! Append-only journal format for mastery ledger entries.
//!
//! This crate provides:
//! - Framed, append-only storage for ledger entry JSON, each frame carrying a
//!   payload digest
//! - Reader/writer APIs with strict and permissive modes
//! - Tail reading from a saved offset, so a long-lived reader can pick up
//!   frames appended after it was opened
//! - Verification of content-derived evidence IDs
//!
//! ## Quick Start
//!
//! ```rust
//! use mastery_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! let dir = std::env::temp_dir().join("mastery-journal-doc");
//! std::fs::create_dir_all(&dir)?;
//! let path = dir.join("ledger.mvj");
//! # let _ = std::fs::remove_file(&path);
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append_entry(&json!({"entry_type": "status_reset", "learner_id": "l1", "target_level": 2}))?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! while let Some(entry) = reader.read_entry()? {
//!     println!("{}", entry["entry_type"]);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`JournalWriter`] - Append entries to journal files
//! - [`JournalReader`] - Read entries from journal files
//! - [`verify_evidence_entry`] - Re-derive an evidence entry's ID

#![deny(missing_docs)]

/// Entry JSON type alias and helpers.
pub mod entry;
/// Error types for journal operations.
pub mod errors;
/// On-disk layout.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Verification helpers for journal entries.
pub mod verification;
/// Journal writer implementation.
pub mod writer;

pub use entry::{entry_type, is_valid_entry_structure, EntryJson};
pub use errors::JournalError;
pub use frame::{FileHeader, FrameHeader, FrameKind};
pub use reader::{JournalReader, ReadMode};
pub use verification::verify_evidence_entry;
pub use writer::{JournalWriter, WriteOptions};
