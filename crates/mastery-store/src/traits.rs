//! Storage backend traits.

use chrono::{DateTime, Utc};
use mastery_core::{EvidenceDraft, EvidenceRecord, LearnerId, Level, VerificationStatus};

use crate::error::StoreError;
use crate::filter::{EvidenceFilter, LearnerFilter};

/// Append-only evidence ledger.
pub trait EvidenceLedger {
    /// Seals a draft at the next sequence number and appends it.
    ///
    /// Never touches verification status rows.
    fn append_evidence(
        &mut self,
        draft: EvidenceDraft,
        recorded_at: DateTime<Utc>,
    ) -> Result<EvidenceRecord, StoreError>;

    /// Returns matching records in ledger order.
    fn scan_evidence(&self, filter: &dyn EvidenceFilter) -> Result<Vec<EvidenceRecord>, StoreError>;

    /// Picks up entries appended by other writers since the last read.
    /// Returns how many were applied. Backends with a single writer have
    /// nothing to do.
    fn refresh(&mut self) -> Result<usize, StoreError> {
        Ok(0)
    }

    /// Returns every record of one learner in ledger order.
    fn evidence_for(&self, learner_id: &LearnerId) -> Result<Vec<EvidenceRecord>, StoreError> {
        self.scan_evidence(&LearnerFilter {
            learner_id: learner_id.clone(),
        })
    }
}

/// Verification status rows, one per (learner, level).
pub trait StatusStore {
    /// Loads one row.
    fn get_status(
        &self,
        learner_id: &LearnerId,
        level: Level,
    ) -> Result<Option<VerificationStatus>, StoreError>;

    /// Loads every row of a learner, ordered by level.
    fn statuses_for(&self, learner_id: &LearnerId) -> Result<Vec<VerificationStatus>, StoreError>;

    /// Writes a row.
    ///
    /// `status.revision` must equal the stored row's revision (0 for a new row);
    /// otherwise the write is rejected with [`StoreError::Conflict`]. Returns the
    /// row as stored, with its revision incremented.
    fn put_status(&mut self, status: VerificationStatus) -> Result<VerificationStatus, StoreError>;

    /// Removes a row. Returns whether one existed.
    fn remove_status(
        &mut self,
        learner_id: &LearnerId,
        level: Level,
        removed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

/// A backend holding both the ledger and the status rows.
pub trait MasteryStore: EvidenceLedger + StatusStore {}

impl<T: EvidenceLedger + StatusStore> MasteryStore for T {}
