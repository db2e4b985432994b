//! The engine facade.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mastery_core::{
    check_level, EngineConfig, EvidenceDraft, EvidenceRecord, ExerciseResult, LearnerId, Level,
    VerificationStatus,
};
use mastery_store::{AndFilter, LearnerFilter, LevelFilter, MasteryStore};
use tracing::info;

use crate::calculators::DimensionReport;
use crate::clock::{Clock, SystemClock};
use crate::dormancy::{self, DormancyEvent, ReturnOutcome};
use crate::error::EngineError;
use crate::gaps::{self, Gap};
use crate::intake::{self, IntakeOutcome};
use crate::promotion::{self, PromotionResult};
use crate::rings::{self, RingView};

/// Mastery verification over one store.
///
/// Mutating operations take `&mut self`, so the read-evaluate-write sequence
/// of an evaluation cannot interleave with another operation on the same
/// engine. Wrap the engine in [`crate::SharedEngine`] to share it across threads.
pub struct MasteryEngine<S> {
    store: S,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl<S: MasteryStore> MasteryEngine<S> {
    /// Creates an engine on the wall clock.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Creates an engine with an explicit time source.
    pub fn with_clock(store: S, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the engine, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Catches the store up with other writers and returns the operation time.
    fn begin_write(&mut self) -> Result<DateTime<Utc>, EngineError> {
        self.store.refresh()?;
        Ok(self.clock.now())
    }

    fn report(&self, learner_id: &LearnerId, level: Level) -> Result<DimensionReport, EngineError> {
        let records = self.store.evidence_for(learner_id)?;
        Ok(DimensionReport::compute(&records, level, &self.config))
    }

    /// Places a learner at a level. Creates the provisional row once; later
    /// calls return the existing row untouched.
    pub fn assign_level(
        &mut self,
        learner_id: &LearnerId,
        level: Level,
    ) -> Result<VerificationStatus, EngineError> {
        check_level(level)?;
        let now = self.begin_write()?;
        if let Some(existing) = self.store.get_status(learner_id, level)? {
            return Ok(existing);
        }
        let placed = VerificationStatus::placed(learner_id.clone(), level, now);
        let stored = self.store.put_status(placed)?;
        info!(learner = %learner_id, level, "level assigned");
        Ok(stored)
    }

    /// Removes a status row. Evidence stays in the ledger.
    pub fn reset(&mut self, learner_id: &LearnerId, level: Level) -> Result<bool, EngineError> {
        let now = self.begin_write()?;
        let removed = self.store.remove_status(learner_id, level, now)?;
        if removed {
            info!(learner = %learner_id, level, "status reset");
        }
        Ok(removed)
    }

    /// Appends pre-classified evidence. Status rows are not touched.
    pub fn record_evidence(&mut self, draft: EvidenceDraft) -> Result<EvidenceRecord, EngineError> {
        check_level(draft.target_level)?;
        let now = self.begin_write()?;
        Ok(self.store.append_evidence(draft, now)?)
    }

    /// Intake for one graded exercise result.
    pub fn process(
        &mut self,
        learner_id: &LearnerId,
        result: &ExerciseResult,
    ) -> Result<IntakeOutcome, EngineError> {
        check_level(result.level)?;
        let now = self.begin_write()?;
        Ok(intake::process(
            &mut self.store,
            &self.config,
            learner_id,
            result,
            now,
        )?)
    }

    /// Runs the promotion evaluator for one level.
    pub fn evaluate(
        &mut self,
        learner_id: &LearnerId,
        level: Level,
    ) -> Result<PromotionResult, EngineError> {
        let now = self.begin_write()?;
        Ok(promotion::evaluate(
            &mut self.store,
            &self.config,
            learner_id,
            level,
            now,
        )?)
    }

    /// One row when `level` is given, otherwise every row of the learner by level.
    pub fn get_status(
        &self,
        learner_id: &LearnerId,
        level: Option<Level>,
    ) -> Result<Vec<VerificationStatus>, EngineError> {
        match level {
            Some(level) => Ok(self
                .store
                .get_status(learner_id, level)?
                .into_iter()
                .collect()),
            None => Ok(self.store.statuses_for(learner_id)?),
        }
    }

    /// Live ring views for one level, computed from the ledger.
    pub fn get_ring_data(
        &self,
        learner_id: &LearnerId,
        level: Level,
    ) -> Result<Vec<RingView>, EngineError> {
        let report = self.report(learner_id, level)?;
        Ok(rings::ring_data(&report, &self.config.targets))
    }

    /// Unmet dimensions of a provisional or dormant level. Empty for a missing
    /// or confirmed row.
    pub fn detect_gaps(&self, learner_id: &LearnerId, level: Level) -> Result<Vec<Gap>, EngineError> {
        match self.store.get_status(learner_id, level)? {
            Some(status) if !status.is_confirmed() => {
                let report = self.report(learner_id, level)?;
                Ok(gaps::detect(&report, &self.config))
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Most recent evidence first, at most `limit` records.
    ///
    /// The level filter matches the record's own level, so foundation checks
    /// appear under the level they test.
    pub fn get_evidence_log(
        &self,
        learner_id: &LearnerId,
        level: Option<Level>,
        limit: usize,
    ) -> Result<Vec<EvidenceRecord>, EngineError> {
        let mut filter = AndFilter::default().with(LearnerFilter {
            learner_id: learner_id.clone(),
        });
        if let Some(level) = level {
            filter = filter.with(LevelFilter { level });
        }
        let mut records = self.store.scan_evidence(&filter)?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    /// Checks the learner's most recently active row for inactivity.
    pub fn check_dormancy(
        &mut self,
        learner_id: &LearnerId,
    ) -> Result<Option<DormancyEvent>, EngineError> {
        let now = self.begin_write()?;
        Ok(dormancy::check_dormancy(
            &mut self.store,
            &self.config,
            learner_id,
            now,
        )?)
    }

    /// Return flow after a warmup.
    pub fn handle_return(
        &mut self,
        learner_id: &LearnerId,
        warmup_passed: bool,
    ) -> Result<ReturnOutcome, EngineError> {
        let now = self.begin_write()?;
        Ok(dormancy::handle_return(
            &mut self.store,
            &self.config,
            learner_id,
            warmup_passed,
            now,
        )?)
    }
}
