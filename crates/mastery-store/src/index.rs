//! Replay index shared by the backends.

use std::collections::BTreeMap;

use mastery_core::{EvidenceRecord, LearnerId, Level, VerificationStatus};
use tracing::debug;

use crate::entry::LedgerEntry;
use crate::error::StoreError;
use crate::filter::EvidenceFilter;

/// In-memory state derived by replaying ledger entries in order.
#[derive(Debug, Default, Clone)]
pub struct LedgerIndex {
    evidence: Vec<EvidenceRecord>,
    statuses: BTreeMap<(LearnerId, Level), VerificationStatus>,
    skipped: usize,
}

impl LedgerIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one entry.
    pub fn apply(&mut self, entry: LedgerEntry) {
        match entry {
            LedgerEntry::Evidence(record) => self.evidence.push(record),
            LedgerEntry::Status(status) => {
                let key = (status.learner_id.clone(), status.target_level);
                self.statuses.insert(key, status);
            }
            LedgerEntry::StatusReset(reset) => {
                self.statuses.remove(&(reset.learner_id, reset.target_level));
            }
            LedgerEntry::Unknown(json) => {
                debug!(entry_type = ?json.get("entry_type"), "skipping unknown ledger entry");
                self.skipped += 1;
            }
        }
    }

    /// Sequence number the next evidence record receives.
    pub fn next_seq(&self) -> u64 {
        self.evidence.last().map(|r| r.seq + 1).unwrap_or(0)
    }

    /// Number of evidence records.
    pub fn evidence_len(&self) -> usize {
        self.evidence.len()
    }

    /// Number of unknown entries skipped during replay.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Matching records in ledger order.
    pub fn scan(&self, filter: &dyn EvidenceFilter) -> Vec<EvidenceRecord> {
        self.evidence
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// One status row.
    pub fn status(&self, learner_id: &LearnerId, level: Level) -> Option<&VerificationStatus> {
        self.statuses.get(&(learner_id.clone(), level))
    }

    /// Every row of a learner, ordered by level.
    pub fn statuses_for(&self, learner_id: &LearnerId) -> Vec<VerificationStatus> {
        self.statuses
            .range((learner_id.clone(), Level::MIN)..=(learner_id.clone(), Level::MAX))
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Checks a pending write against the stored revision and returns the row to store.
    pub fn prepare_put(&self, status: VerificationStatus) -> Result<VerificationStatus, StoreError> {
        let found = self
            .status(&status.learner_id, status.target_level)
            .map(|s| s.revision)
            .unwrap_or(0);
        if found != status.revision {
            return Err(StoreError::Conflict {
                learner_id: status.learner_id,
                level: status.target_level,
                expected: status.revision,
                found,
            });
        }
        let mut next = status;
        next.revision += 1;
        Ok(next)
    }
}
