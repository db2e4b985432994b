//! Dormancy monitor and the return flow.
//!
//! Transitions are evaluated on demand; nothing here runs on a timer.

use chrono::{DateTime, Duration, Utc};
use mastery_core::{ConfirmedPolicy, EngineConfig, LearnerId, Level, StatusKind, VerificationStatus};
use mastery_store::{MasteryStore, StoreError};
use serde::Serialize;
use tracing::info;

use crate::calculators::DimensionReport;
use crate::gaps::{self, Gap};

/// A row that just went dormant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DormancyEvent {
    /// Learner.
    pub learner_id: LearnerId,
    /// Level of the row.
    pub level: Level,
    /// State the row left.
    pub previous: StatusKind,
    /// Last recorded activity.
    pub last_activity_at: DateTime<Utc>,
    /// Whole days since that activity.
    pub inactive_days: i64,
}

/// Outcome of [`handle_return`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReturnOutcome {
    /// The learner has no dormant row.
    NotDormant,
    /// Warmup passed; the learner resumes at their level.
    Restored {
        /// Learner.
        learner_id: LearnerId,
        /// Level resumed.
        level: Level,
    },
    /// Warmup failed; the learner resumes at their level with refresher content.
    RefresherOffered {
        /// Learner.
        learner_id: LearnerId,
        /// Level resumed.
        level: Level,
        /// What to practise first.
        refresher: Vec<Gap>,
    },
}

impl ReturnOutcome {
    /// Stable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ReturnOutcome::NotDormant => "not_dormant",
            ReturnOutcome::Restored { .. } => "restored",
            ReturnOutcome::RefresherOffered { .. } => "refresher_offered",
        }
    }
}

/// Idle period after which `status` lapses, or `None` if it never does.
///
/// A window too large for `Duration` never elapses.
fn lapse_after(status: &VerificationStatus, config: &EngineConfig) -> Option<Duration> {
    let days = match status.status {
        StatusKind::Provisional => config.dormancy.inactivity_days,
        StatusKind::Confirmed => match config.dormancy.confirmed_policy {
            ConfirmedPolicy::Exempt => return None,
            ConfirmedPolicy::Lapse => config.dormancy.confirmed_lapse_days,
        },
        StatusKind::Dormant | StatusKind::None => return None,
    };
    Duration::try_days(days)
}

/// The row with the latest activity; ties go to the higher level.
fn most_recent(rows: Vec<VerificationStatus>) -> Option<VerificationStatus> {
    rows.into_iter()
        .max_by(|a, b| {
            a.last_activity_at
                .cmp(&b.last_activity_at)
                .then(a.target_level.cmp(&b.target_level))
        })
}

/// Moves the learner's most recently active row to dormant if it has been idle
/// longer than allowed.
pub fn check_dormancy<S: MasteryStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    learner_id: &LearnerId,
    now: DateTime<Utc>,
) -> Result<Option<DormancyEvent>, StoreError> {
    let Some(mut status) = most_recent(store.statuses_for(learner_id)?) else {
        return Ok(None);
    };
    let Some(allowed) = lapse_after(&status, config) else {
        return Ok(None);
    };
    if now - status.last_activity_at <= allowed {
        return Ok(None);
    }

    let event = DormancyEvent {
        learner_id: learner_id.clone(),
        level: status.target_level,
        previous: status.status,
        last_activity_at: status.last_activity_at,
        inactive_days: status.inactive_days(now),
    };
    status.status = StatusKind::Dormant;
    status.confirmed_at = None;
    store.put_status(status)?;

    info!(
        learner = %learner_id,
        level = event.level,
        previous = %event.previous,
        inactive_days = event.inactive_days,
        "level went dormant"
    );
    Ok(Some(event))
}

/// Brings the learner's highest dormant level back to provisional.
///
/// Never lowers the level and never starts reassessment. A failed warmup only
/// changes the outcome, which then carries the current gaps as refresher content.
pub fn handle_return<S: MasteryStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    learner_id: &LearnerId,
    warmup_passed: bool,
    now: DateTime<Utc>,
) -> Result<ReturnOutcome, StoreError> {
    let dormant = store
        .statuses_for(learner_id)?
        .into_iter()
        .filter(|s| s.status == StatusKind::Dormant)
        .max_by_key(|s| s.target_level);
    let Some(mut status) = dormant else {
        return Ok(ReturnOutcome::NotDormant);
    };

    let level = status.target_level;
    status.status = StatusKind::Provisional;
    status.last_activity_at = now;
    store.put_status(status)?;

    info!(learner = %learner_id, level, warmup_passed, "learner returned");

    if warmup_passed {
        return Ok(ReturnOutcome::Restored {
            learner_id: learner_id.clone(),
            level,
        });
    }

    let records = store.evidence_for(learner_id)?;
    let report = DimensionReport::compute(&records, level, config);
    Ok(ReturnOutcome::RefresherOffered {
        learner_id: learner_id.clone(),
        level,
        refresher: gaps::detect(&report, config),
    })
}
