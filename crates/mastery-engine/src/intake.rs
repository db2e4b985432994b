//! Exercise result intake: classify a graded result into evidence, record it,
//! touch activity and evaluate promotion.

use chrono::{DateTime, Utc};
use mastery_core::{
    Dimension, EngineConfig, EvidenceDraft, EvidenceId, ExerciseResult, LearnerId,
};
use mastery_store::{MasteryStore, StoreError};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::promotion::{self, PromotionEvent, PromotionResult};

/// What one intake call did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeOutcome {
    /// Dimensions that received evidence, in classification order.
    pub evidence_recorded: Vec<Dimension>,
    /// Ids of the appended records.
    pub evidence_ids: Vec<EvidenceId>,
    /// Evaluation of the result's level after recording.
    pub promotion: PromotionResult,
}

impl IntakeOutcome {
    /// The promotion event, if the result completed the level.
    pub fn promotion_event(&self) -> Option<&PromotionEvent> {
        self.promotion.promotion()
    }
}

/// Maps a graded result to evidence drafts. The rules are independent: one
/// result can produce several drafts, or none.
pub fn classify(
    learner_id: &LearnerId,
    result: &ExerciseResult,
    config: &EngineConfig,
) -> Vec<EvidenceDraft> {
    let mut drafts = Vec::new();

    if result.is_curveball {
        let score = result.curveball_score.unwrap_or(result.total_score);
        let mut detail = json!({ "max_score": config.depth.max_score });
        if let Some(kind) = &result.curveball_type {
            detail["curveball_type"] = json!(kind);
        }
        drafts.push(
            EvidenceDraft::new(
                Dimension::Depth,
                learner_id.clone(),
                result.level,
                score,
                score >= config.depth.pass_score,
            )
            .with_detail(detail),
        );
    } else if result.passed && config.breadth.elevated_tiers.contains(&result.tier) {
        if let Some(tag) = &result.context_tag {
            drafts.push(
                EvidenceDraft::new(
                    Dimension::Breadth,
                    learner_id.clone(),
                    result.level,
                    result.total_score,
                    true,
                )
                .with_context_tag(tag.clone())
                .with_detail(json!({ "tier": result.tier })),
            );
        }
    }

    if result.is_foundation_check {
        let check_level = result
            .check_level
            .unwrap_or_else(|| result.level.saturating_sub(1));
        if (1..result.level).contains(&check_level) {
            drafts.push(EvidenceDraft::new(
                Dimension::Foundation,
                learner_id.clone(),
                check_level,
                result.total_score,
                result.passed,
            ));
        } else {
            warn!(
                learner = %learner_id,
                exercise = %result.exercise_id,
                level = result.level,
                check_level,
                "foundation check level must be below the working level; ignored"
            );
        }
    }

    if result.is_capstone {
        drafts.push(EvidenceDraft::new(
            Dimension::Application,
            learner_id.clone(),
            result.level,
            result.total_score,
            result.passed,
        ));
    }

    drafts
        .into_iter()
        .map(|d| d.with_source_exercise(result.exercise_id.clone()))
        .collect()
}

/// Records the result's evidence, touches the level's activity time and
/// evaluates promotion.
pub fn process<S: MasteryStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    learner_id: &LearnerId,
    result: &ExerciseResult,
    now: DateTime<Utc>,
) -> Result<IntakeOutcome, StoreError> {
    let drafts = classify(learner_id, result, config);
    if drafts.is_empty() {
        warn!(
            learner = %learner_id,
            exercise = %result.exercise_id,
            "exercise result matched no evidence rule"
        );
    }

    let mut evidence_recorded = Vec::with_capacity(drafts.len());
    let mut evidence_ids = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let record = store.append_evidence(draft, now)?;
        debug!(
            learner = %learner_id,
            evidence_id = %record.evidence_id,
            dimension = %record.dimension,
            "evidence recorded"
        );
        evidence_recorded.push(record.dimension);
        evidence_ids.push(record.evidence_id);
    }

    if let Some(mut status) = store.get_status(learner_id, result.level)? {
        status.last_activity_at = now;
        store.put_status(status)?;
    }

    let promotion = promotion::evaluate(store, config, learner_id, result.level, now)?;
    Ok(IntakeOutcome {
        evidence_recorded,
        evidence_ids,
        promotion,
    })
}
