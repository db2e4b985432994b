//! Journal-backed storage implementation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mastery_core::{EvidenceDraft, EvidenceRecord, LearnerId, Level, VerificationStatus};
use mastery_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
use tracing::{debug, warn};

use crate::entry::{parse_entry, to_entry_json, LedgerEntry, StatusReset};
use crate::error::StoreError;
use crate::filter::EvidenceFilter;
use crate::index::LedgerIndex;
use crate::traits::{EvidenceLedger, StatusStore};

/// Store persisted to a single `.mvj` journal.
///
/// Opening replays the journal into memory. Every write first catches up on
/// frames appended by other writers, then appends its entry and reads it back,
/// so the in-memory index only ever reflects what is on disk.
pub struct JournalStore {
    path: PathBuf,
    index: LedgerIndex,
    writer: JournalWriter,
    reader: JournalReader,
}

impl JournalStore {
    /// Opens (or creates) a journal store with default write options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with(path, WriteOptions::default())
    }

    /// Opens (or creates) a journal store.
    pub fn open_with<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let writer = JournalWriter::open(&path, options)?;
        let reader = JournalReader::open(&path, ReadMode::Permissive)?;
        let mut store = Self {
            path,
            index: LedgerIndex::new(),
            writer,
            reader,
        };
        let replayed = store.catch_up()?;
        store.drop_torn_tail()?;
        debug!(
            path = %store.path.display(),
            entries = replayed,
            evidence = store.index.evidence_len(),
            "replayed mastery journal"
        );
        Ok(store)
    }

    /// Path of the backing journal.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies entries appended since the last read. Returns how many were applied.
    pub fn catch_up(&mut self) -> Result<usize, StoreError> {
        let mut applied = 0;
        while let Some(json) = self.reader.read_entry()? {
            self.index.apply(parse_entry(&json)?);
            applied += 1;
        }
        Ok(applied)
    }

    /// Truncates a partial frame left behind by a writer that died mid-append,
    /// so the next append does not land after it.
    fn drop_torn_tail(&mut self) -> Result<(), StoreError> {
        let end = self.reader.position();
        let len = self.writer.file_len()?;
        if end < len {
            warn!(
                path = %self.path.display(),
                offset = end,
                dropped = len - end,
                "truncating torn journal tail"
            );
            self.writer.truncate(end)?;
        }
        Ok(())
    }

    fn write(&mut self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let json = to_entry_json(entry)?;
        self.writer.append_entry(&json)?;
        self.catch_up()?;
        Ok(())
    }
}

impl EvidenceLedger for JournalStore {
    fn append_evidence(
        &mut self,
        draft: EvidenceDraft,
        recorded_at: DateTime<Utc>,
    ) -> Result<EvidenceRecord, StoreError> {
        self.catch_up()?;
        let record = EvidenceRecord::seal(draft, self.index.next_seq(), recorded_at)?;
        self.write(&LedgerEntry::Evidence(record.clone()))?;
        Ok(record)
    }

    fn scan_evidence(&self, filter: &dyn EvidenceFilter) -> Result<Vec<EvidenceRecord>, StoreError> {
        Ok(self.index.scan(filter))
    }

    fn refresh(&mut self) -> Result<usize, StoreError> {
        self.catch_up()
    }
}

impl StatusStore for JournalStore {
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
        self.catch_up()?;
        let stored = self.index.prepare_put(status)?;
        self.write(&LedgerEntry::Status(stored.clone()))?;
        Ok(stored)
    }

    fn remove_status(
        &mut self,
        learner_id: &LearnerId,
        level: Level,
        removed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        self.catch_up()?;
        if self.index.status(learner_id, level).is_none() {
            return Ok(false);
        }
        self.write(&LedgerEntry::StatusReset(StatusReset {
            learner_id: learner_id.clone(),
            target_level: level,
            reset_at: removed_at,
        }))?;
        Ok(true)
    }
}
