use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{LearnerId, Level};

/// Lifecycle state of a (learner, level) assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// No assignment yet.
    None,
    /// Assigned, awaiting evidence.
    Provisional,
    /// Certified. Terminal for the pair.
    Confirmed,
    /// Lapsed through inactivity; recoverable via the return flow.
    Dormant,
}

impl StatusKind {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::None => "none",
            StatusKind::Provisional => "provisional",
            StatusKind::Confirmed => "confirmed",
            StatusKind::Dormant => "dormant",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time values of the four dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    /// Fraction of below-level foundation checks passed, two decimals.
    pub foundation_score: f64,
    /// Distinct context tags passed at elevated difficulty.
    pub breadth_count: u32,
    /// Passed curveball scenarios.
    pub depth_count: u32,
    /// Whether the capstone requirement is met.
    pub application_passed: bool,
}

/// One row per (learner, level): lifecycle state plus cached dimension values.
///
/// The cached fields are a materialised view of the ledger as of the last
/// promotion evaluation. Only the evaluator refreshes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationStatus {
    /// Learner.
    pub learner_id: LearnerId,
    /// Level the row certifies.
    pub target_level: Level,
    /// Lifecycle state.
    pub status: StatusKind,
    /// Cached foundation score.
    pub foundation_score: f64,
    /// Cached breadth count.
    pub breadth_count: u32,
    /// Cached depth count.
    pub depth_count: u32,
    /// Cached application flag.
    pub application_passed: bool,
    /// When the row became confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Last scored activity for this level.
    pub last_activity_at: DateTime<Utc>,
    /// Write counter used for optimistic concurrency.
    #[serde(default)]
    pub revision: u64,
}

impl VerificationStatus {
    /// A freshly placed row: provisional, caches zeroed, active now.
    pub fn placed(learner_id: LearnerId, target_level: Level, now: DateTime<Utc>) -> Self {
        Self {
            learner_id,
            target_level,
            status: StatusKind::Provisional,
            foundation_score: 0.0,
            breadth_count: 0,
            depth_count: 0,
            application_passed: false,
            confirmed_at: None,
            last_activity_at: now,
            revision: 0,
        }
    }

    /// Returns the cached dimension values.
    pub fn snapshot(&self) -> DimensionSnapshot {
        DimensionSnapshot {
            foundation_score: self.foundation_score,
            breadth_count: self.breadth_count,
            depth_count: self.depth_count,
            application_passed: self.application_passed,
        }
    }

    /// Overwrites the cached dimension values.
    pub fn refresh_cache(&mut self, snapshot: &DimensionSnapshot) {
        self.foundation_score = snapshot.foundation_score;
        self.breadth_count = snapshot.breadth_count;
        self.depth_count = snapshot.depth_count;
        self.application_passed = snapshot.application_passed;
    }

    /// Whole days since the last activity (zero if the clock went backwards).
    pub fn inactive_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity_at).num_days().max(0)
    }

    /// True once the row is certified.
    pub fn is_confirmed(&self) -> bool {
        self.status == StatusKind::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn placed_row_is_provisional_and_zeroed() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let row = VerificationStatus::placed(LearnerId::parse("l1").unwrap(), 2, now);
        assert_eq!(row.status, StatusKind::Provisional);
        assert_eq!(row.snapshot(), DimensionSnapshot::default());
        assert_eq!(row.last_activity_at, now);
        assert!(row.confirmed_at.is_none());
    }

    #[test]
    fn inactive_days_counts_whole_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut row = VerificationStatus::placed(LearnerId::parse("l1").unwrap(), 2, now);
        row.last_activity_at = now - Duration::hours(24 * 31 - 1);
        assert_eq!(row.inactive_days(now), 30);
        row.last_activity_at = now + Duration::days(2);
        assert_eq!(row.inactive_days(now), 0);
    }
}
