//! Thread-safe engine handle.

use std::sync::{Arc, Mutex};

use mastery_core::{ExerciseResult, LearnerId, Level};
use mastery_store::MasteryStore;

use crate::dormancy::{DormancyEvent, ReturnOutcome};
use crate::engine::MasteryEngine;
use crate::error::EngineError;
use crate::intake::IntakeOutcome;
use crate::promotion::PromotionResult;

/// A cloneable handle that serializes every operation on one engine.
///
/// Two submissions for the same learner can never interleave their
/// evaluate-then-confirm sequences.
pub struct SharedEngine<S> {
    inner: Arc<Mutex<MasteryEngine<S>>>,
}

impl<S> Clone for SharedEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MasteryStore> SharedEngine<S> {
    /// Wraps an engine.
    pub fn new(engine: MasteryEngine<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut MasteryEngine<S>) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut engine = self.inner.lock().map_err(|_| EngineError::Poisoned)?;
        f(&mut engine)
    }

    /// See [`MasteryEngine::process`].
    pub fn process(
        &self,
        learner_id: &LearnerId,
        result: &ExerciseResult,
    ) -> Result<IntakeOutcome, EngineError> {
        self.with(|engine| engine.process(learner_id, result))
    }

    /// See [`MasteryEngine::evaluate`].
    pub fn evaluate(&self, learner_id: &LearnerId, level: Level) -> Result<PromotionResult, EngineError> {
        self.with(|engine| engine.evaluate(learner_id, level))
    }

    /// See [`MasteryEngine::check_dormancy`].
    pub fn check_dormancy(&self, learner_id: &LearnerId) -> Result<Option<DormancyEvent>, EngineError> {
        self.with(|engine| engine.check_dormancy(learner_id))
    }

    /// See [`MasteryEngine::handle_return`].
    pub fn handle_return(
        &self,
        learner_id: &LearnerId,
        warmup_passed: bool,
    ) -> Result<ReturnOutcome, EngineError> {
        self.with(|engine| engine.handle_return(learner_id, warmup_passed))
    }
}
