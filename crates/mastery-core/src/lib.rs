//! Core data model for the mastery verification engine.
//!
//! This crate provides:
//! - Validated identifiers (`LearnerId`, `ContextTag`) and content-derived `EvidenceId`s
//! - The four evidence dimensions and the evidence record shape
//! - Verification status rows with their cached dimension snapshot
//! - The grading collaborator's exercise result shape
//! - Process-wide engine configuration (dimension targets, dormancy policy)
//!
//! Core invariants:
//! - Evidence records are immutable once sealed; the ledger is the source of truth
//! - Cached dimension fields on a status row are a view, never authoritative
//! - Nothing in this crate performs I/O except `EngineConfig::load`
//!
#![deny(missing_docs)]

/// Engine configuration and dimension targets.
pub mod config;
/// Evidence dimensions and evidence types.
pub mod dimension;
/// Error types for core operations.
pub mod errors;
/// Evidence records and drafts.
pub mod evidence;
/// Content-derived evidence identifiers.
pub mod evidence_id;
/// Exercise results produced by the grading collaborator.
pub mod exercise;
/// Validated identifiers.
pub mod identifiers;
/// Verification status rows.
pub mod status;
/// Validation helpers used by core types.
pub mod validation;

pub use config::{
    BreadthConfig, ConfigError, ConfirmedPolicy, DepthConfig, DimensionTargets, DormancyConfig,
    EngineConfig, FoundationConfig, PromotionConfig, MAX_DORMANCY_DAYS,
};
pub use dimension::{Dimension, EvidenceType};
pub use errors::CoreError;
pub use evidence::{EvidenceDraft, EvidenceRecord};
pub use evidence_id::{compute_evidence_id, EvidenceId, EvidenceIdError};
pub use exercise::{ExerciseResult, Tier};
pub use identifiers::{check_level, ContextTag, LearnerId, Level};
pub use status::{DimensionSnapshot, StatusKind, VerificationStatus};
pub use validation::ValidationError;
