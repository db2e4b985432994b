//! Promotion evaluation.
//!
//! The evaluator is the only code that writes the cached dimension fields of a
//! status row, and the only code that moves a row to `confirmed`.

use chrono::{DateTime, Utc};
use mastery_core::{
    Dimension, DimensionSnapshot, EngineConfig, LearnerId, Level, StatusKind, VerificationStatus,
};
use mastery_store::{MasteryStore, StoreError};
use serde::Serialize;
use tracing::{debug, info};

use crate::calculators::DimensionReport;

/// Emitted when a row is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionEvent {
    /// Learner promoted.
    pub learner_id: LearnerId,
    /// Level confirmed.
    pub level: Level,
    /// Confirmation instant.
    pub confirmed_at: DateTime<Utc>,
    /// XP awarded for the promotion.
    pub xp_bonus: u32,
    /// Breadth plus depth evidence behind the promotion.
    pub evidence_count: u32,
    /// Human-readable summary.
    pub summary: String,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromotionResult {
    /// No status row for the pair.
    NoStatus,
    /// The row was already confirmed; nothing changed.
    AlreadyConfirmed {
        /// When it was confirmed.
        confirmed_at: Option<DateTime<Utc>>,
    },
    /// The row is dormant. Caches were refreshed but dormant rows are not promoted.
    Dormant {
        /// Current dimension values.
        snapshot: DimensionSnapshot,
    },
    /// At least one target is unmet.
    NotYet {
        /// Current dimension values.
        snapshot: DimensionSnapshot,
        /// Dimensions below target.
        unmet: Vec<Dimension>,
    },
    /// All four targets met; the row is now confirmed.
    Promoted(PromotionEvent),
}

impl PromotionResult {
    /// The promotion event, if this evaluation promoted.
    pub fn promotion(&self) -> Option<&PromotionEvent> {
        match self {
            PromotionResult::Promoted(event) => Some(event),
            _ => None,
        }
    }

    /// Consumes the result, keeping only a promotion event.
    pub fn into_promotion(self) -> Option<PromotionEvent> {
        match self {
            PromotionResult::Promoted(event) => Some(event),
            _ => None,
        }
    }

    /// Stable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            PromotionResult::NoStatus => "no_status",
            PromotionResult::AlreadyConfirmed { .. } => "already_confirmed",
            PromotionResult::Dormant { .. } => "dormant",
            PromotionResult::NotYet { .. } => "not_yet",
            PromotionResult::Promoted(_) => "promoted",
        }
    }
}

fn persist_if_changed<S: MasteryStore + ?Sized>(
    store: &mut S,
    mut status: VerificationStatus,
    snapshot: &DimensionSnapshot,
) -> Result<(), StoreError> {
    if status.snapshot() == *snapshot {
        return Ok(());
    }
    status.refresh_cache(snapshot);
    store.put_status(status)?;
    Ok(())
}

/// Evaluates one (learner, level) against the configured targets.
///
/// Repeat calls without new evidence write nothing. Cache refreshes and the
/// confirmation go through a revision-checked `put_status`, so a concurrent
/// writer surfaces as [`StoreError::Conflict`] instead of a lost update.
pub fn evaluate<S: MasteryStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    learner_id: &LearnerId,
    level: Level,
    now: DateTime<Utc>,
) -> Result<PromotionResult, StoreError> {
    let Some(status) = store.get_status(learner_id, level)? else {
        return Ok(PromotionResult::NoStatus);
    };
    if status.is_confirmed() {
        return Ok(PromotionResult::AlreadyConfirmed {
            confirmed_at: status.confirmed_at,
        });
    }

    let records = store.evidence_for(learner_id)?;
    let report = DimensionReport::compute(&records, level, config);
    let snapshot = report.snapshot();

    if status.status == StatusKind::Dormant {
        persist_if_changed(store, status, &snapshot)?;
        return Ok(PromotionResult::Dormant { snapshot });
    }

    let unmet = report.unmet(&config.targets);
    if !unmet.is_empty() {
        debug!(
            learner = %learner_id,
            level,
            ?unmet,
            "promotion not yet earned"
        );
        persist_if_changed(store, status, &snapshot)?;
        return Ok(PromotionResult::NotYet { snapshot, unmet });
    }

    let mut confirmed = status;
    confirmed.refresh_cache(&snapshot);
    confirmed.status = StatusKind::Confirmed;
    confirmed.confirmed_at = Some(now);
    store.put_status(confirmed)?;

    let evidence_count = report.breadth.count + report.depth.count;
    let event = PromotionEvent {
        learner_id: learner_id.clone(),
        level,
        confirmed_at: now,
        xp_bonus: config.promotion.xp_bonus,
        evidence_count,
        summary: format!(
            "Level {level} confirmed with {evidence_count} pieces of breadth and depth evidence"
        ),
    };
    info!(
        learner = %learner_id,
        level,
        xp_bonus = event.xp_bonus,
        "level confirmed"
    );
    Ok(PromotionResult::Promoted(event))
}
