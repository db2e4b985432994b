use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dimension::{Dimension, EvidenceType};
use crate::errors::CoreError;
use crate::evidence_id::{compute_evidence_id, EvidenceId};
use crate::identifiers::{ContextTag, LearnerId, Level};
use crate::validation::ValidationError;

/// One immutable row of the evidence ledger.
///
/// Foundation rows carry the *check* level in `target_level`: a retention check
/// of level 2 taken while working towards level 3 is stored at level 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Content-derived identifier.
    pub evidence_id: EvidenceId,
    /// Position in the ledger (0-based, gap free).
    pub seq: u64,
    /// Learner the evidence belongs to.
    pub learner_id: LearnerId,
    /// Level the evidence speaks to.
    pub target_level: Level,
    /// Dimension the evidence counts towards.
    pub dimension: Dimension,
    /// What kind of activity produced the evidence.
    pub evidence_type: EvidenceType,
    /// Context tag (breadth evidence).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_tag: Option<ContextTag>,
    /// Raw score reported by the grader.
    pub score: f64,
    /// Whether the attempt counts as a pass for its dimension.
    pub passed: bool,
    /// Exercise that produced the evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_exercise_id: Option<String>,
    /// Opaque payload kept for audit.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub detail: Value,
    /// When the evidence was recorded.
    pub created_at: DateTime<Utc>,
}

impl EvidenceRecord {
    /// Seals a draft into a ledger record at the given sequence number.
    ///
    /// Non-finite scores are rejected: JSON has no encoding for them.
    pub fn seal(
        draft: EvidenceDraft,
        seq: u64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if !draft.score.is_finite() {
            return Err(ValidationError::OutOfBounds {
                field: "score",
                value: draft.score.to_string(),
            }
            .into());
        }
        let mut record = EvidenceRecord {
            evidence_id: EvidenceId::new(String::new()),
            seq,
            learner_id: draft.learner_id,
            target_level: draft.target_level,
            dimension: draft.dimension,
            evidence_type: draft.evidence_type,
            context_tag: draft.context_tag,
            score: draft.score,
            passed: draft.passed,
            source_exercise_id: draft.source_exercise_id,
            detail: draft.detail,
            created_at,
        };
        record.evidence_id = compute_evidence_id(&record)?;
        Ok(record)
    }

    /// Recomputes the content-derived ID and compares it to the stored one.
    pub fn verify_id(&self) -> Result<bool, CoreError> {
        Ok(compute_evidence_id(self)? == self.evidence_id)
    }
}

/// Evidence waiting to be appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceDraft {
    /// Learner the evidence belongs to.
    pub learner_id: LearnerId,
    /// Level the evidence speaks to (the check level for foundation rows).
    pub target_level: Level,
    /// Dimension the evidence counts towards.
    pub dimension: Dimension,
    /// Evidence kind.
    pub evidence_type: EvidenceType,
    /// Optional context tag.
    pub context_tag: Option<ContextTag>,
    /// Raw score.
    pub score: f64,
    /// Pass flag.
    pub passed: bool,
    /// Optional source exercise.
    pub source_exercise_id: Option<String>,
    /// Opaque detail payload.
    pub detail: Value,
}

impl EvidenceDraft {
    /// Creates a draft with the dimension's default evidence type.
    pub fn new(
        dimension: Dimension,
        learner_id: LearnerId,
        target_level: Level,
        score: f64,
        passed: bool,
    ) -> Self {
        Self {
            learner_id,
            target_level,
            dimension,
            evidence_type: EvidenceType::for_dimension(dimension),
            context_tag: None,
            score,
            passed,
            source_exercise_id: None,
            detail: Value::Null,
        }
    }

    /// Sets the context tag.
    pub fn with_context_tag(mut self, tag: ContextTag) -> Self {
        self.context_tag = Some(tag);
        self
    }

    /// Sets the source exercise.
    pub fn with_source_exercise(mut self, exercise_id: impl Into<String>) -> Self {
        self.source_exercise_id = Some(exercise_id.into());
        self
    }

    /// Sets the opaque detail payload.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn learner() -> LearnerId {
        LearnerId::parse("learner-1").unwrap()
    }

    #[test]
    fn sealed_record_verifies() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let draft = EvidenceDraft::new(Dimension::Depth, learner(), 3, 4.0, true)
            .with_source_exercise("ex-1")
            .with_detail(json!({"curveball_type": "misdirection"}));
        let record = EvidenceRecord::seal(draft, 0, at).unwrap();
        assert_eq!(record.evidence_type, EvidenceType::Curveball);
        assert!(record.verify_id().unwrap());
    }

    #[test]
    fn tampered_record_fails_verification() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let draft = EvidenceDraft::new(Dimension::Application, learner(), 2, 0.4, false);
        let mut record = EvidenceRecord::seal(draft, 7, at).unwrap();
        record.passed = true;
        assert!(!record.verify_id().unwrap());
    }

    #[test]
    fn same_content_different_seq_gets_distinct_ids() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let draft = EvidenceDraft::new(Dimension::Depth, learner(), 3, 4.0, true);
        let a = EvidenceRecord::seal(draft.clone(), 0, at).unwrap();
        let b = EvidenceRecord::seal(draft, 1, at).unwrap();
        assert_ne!(a.evidence_id, b.evidence_id);
    }

    #[test]
    fn non_finite_score_is_rejected() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let draft = EvidenceDraft::new(Dimension::Depth, learner(), 2, score, false);
            let err = EvidenceRecord::seal(draft, 0, at).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::OutOfBounds { field: "score", .. })
            ));
        }
    }

    #[test]
    fn record_round_trips_through_json() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let draft = EvidenceDraft::new(Dimension::Breadth, learner(), 3, 0.75, true)
            .with_context_tag(ContextTag::parse("formal").unwrap());
        let record = EvidenceRecord::seal(draft, 3, at).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("detail").is_none());
        let restored: EvidenceRecord = serde_json::from_value(value).unwrap();
        assert_eq!(restored, record);
        assert!(restored.verify_id().unwrap());
    }
}
