//! Evidence filtering API for selective ledger scans.

use chrono::{DateTime, Utc};
use mastery_core::{Dimension, EvidenceRecord, LearnerId, Level};

/// Trait for filtering evidence records during a scan.
pub trait EvidenceFilter {
    /// Returns true if the record matches the filter criteria.
    fn matches(&self, record: &EvidenceRecord) -> bool;
}

/// Filter by learner.
#[derive(Debug, Clone)]
pub struct LearnerFilter {
    /// Learner to match.
    pub learner_id: LearnerId,
}

impl EvidenceFilter for LearnerFilter {
    fn matches(&self, record: &EvidenceRecord) -> bool {
        record.learner_id == self.learner_id
    }
}

/// Filter by the level a record speaks to.
#[derive(Debug, Clone)]
pub struct LevelFilter {
    /// Level to match.
    pub level: Level,
}

impl EvidenceFilter for LevelFilter {
    fn matches(&self, record: &EvidenceRecord) -> bool {
        record.target_level == self.level
    }
}

/// Filter by dimension.
#[derive(Debug, Clone)]
pub struct DimensionFilter {
    /// Dimension to match.
    pub dimension: Dimension,
}

impl EvidenceFilter for DimensionFilter {
    fn matches(&self, record: &EvidenceRecord) -> bool {
        record.dimension == self.dimension
    }
}

/// Filter on the pass flag.
#[derive(Debug, Clone)]
pub struct PassedFilter {
    /// Pass flag to match.
    pub passed: bool,
}

impl EvidenceFilter for PassedFilter {
    fn matches(&self, record: &EvidenceRecord) -> bool {
        record.passed == self.passed
    }
}

/// Filter by creation time.
#[derive(Debug, Clone)]
pub struct TimeRangeFilter {
    /// Include records created at or after this instant.
    pub after: Option<DateTime<Utc>>,
    /// Include records created at or before this instant.
    pub before: Option<DateTime<Utc>>,
}

impl EvidenceFilter for TimeRangeFilter {
    fn matches(&self, record: &EvidenceRecord) -> bool {
        if let Some(after) = self.after {
            if record.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.before {
            if record.created_at > before {
                return false;
            }
        }
        true
    }
}

/// Composite filter: all filters must match (AND).
#[derive(Default)]
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn EvidenceFilter>>,
}

impl AndFilter {
    /// Adds a filter to the conjunction.
    pub fn with(mut self, filter: impl EvidenceFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl EvidenceFilter for AndFilter {
    fn matches(&self, record: &EvidenceRecord) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}
