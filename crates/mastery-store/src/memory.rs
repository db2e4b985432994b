//! In-memory storage implementation.

use chrono::{DateTime, Utc};
use mastery_core::{EvidenceDraft, EvidenceRecord, LearnerId, Level, VerificationStatus};

use crate::entry::{LedgerEntry, StatusReset};
use crate::error::StoreError;
use crate::filter::EvidenceFilter;
use crate::index::LedgerIndex;
use crate::traits::{EvidenceLedger, StatusStore};

/// Volatile store for tests and embedding hosts that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    index: LedgerIndex,
    entries: Vec<LedgerEntry>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry written so far, in order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    fn write(&mut self, entry: LedgerEntry) {
        self.entries.push(entry.clone());
        self.index.apply(entry);
    }
}

impl EvidenceLedger for MemoryStore {
    fn append_evidence(
        &mut self,
        draft: EvidenceDraft,
        recorded_at: DateTime<Utc>,
    ) -> Result<EvidenceRecord, StoreError> {
        let record = EvidenceRecord::seal(draft, self.index.next_seq(), recorded_at)?;
        self.write(LedgerEntry::Evidence(record.clone()));
        Ok(record)
    }

    fn scan_evidence(&self, filter: &dyn EvidenceFilter) -> Result<Vec<EvidenceRecord>, StoreError> {
        Ok(self.index.scan(filter))
    }
}

impl StatusStore for MemoryStore {
    fn get_status(
        &self,
        learner_id: &LearnerId,
        level: Level,
    ) -> Result<Option<VerificationStatus>, StoreError> {
        Ok(self.index.status(learner_id, level).cloned())
    }

    fn statuses_for(&self, learner_id: &LearnerId) -> Result<Vec<VerificationStatus>, StoreError> {
        Ok(self.index.statuses_for(learner_id))
    }

    fn put_status(&mut self, status: VerificationStatus) -> Result<VerificationStatus, StoreError> {
        let stored = self.index.prepare_put(status)?;
        self.write(LedgerEntry::Status(stored.clone()));
        Ok(stored)
    }

    fn remove_status(
        &mut self,
        learner_id: &LearnerId,
        level: Level,
        removed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if self.index.status(learner_id, level).is_none() {
            return Ok(false);
        }
        self.write(LedgerEntry::StatusReset(StatusReset {
            learner_id: learner_id.clone(),
            target_level: level,
            reset_at: removed_at,
        }));
        Ok(true)
    }
}
