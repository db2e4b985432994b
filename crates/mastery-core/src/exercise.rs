use serde::{Deserialize, Serialize};

use crate::identifiers::{ContextTag, Level};
use crate::validation::ValidationError;

/// Difficulty tier an exercise was declared at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Regular difficulty.
    #[default]
    Standard,
    /// Elevated difficulty.
    Stretch,
    /// Highest difficulty.
    Elite,
}

impl Tier {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Standard => "standard",
            Tier::Stretch => "stretch",
            Tier::Elite => "elite",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Tier::Standard),
            "stretch" => Ok(Tier::Stretch),
            "elite" => Ok(Tier::Elite),
            other => Err(ValidationError::PatternMismatch {
                field: "tier",
                value: other.to_string(),
            }),
        }
    }
}

/// One graded learner action, as produced by the grading collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResult {
    /// Exercise that was graded.
    pub exercise_id: String,
    /// Adversarial scenario flag.
    #[serde(default)]
    pub is_curveball: bool,
    /// Curveball score out of the configured maximum (5 by default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curveball_score: Option<f64>,
    /// Curveball flavour, kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curveball_type: Option<String>,
    /// Grader's pass verdict.
    pub passed: bool,
    /// Overall score.
    pub total_score: f64,
    /// Context the exercise was set in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_tag: Option<ContextTag>,
    /// Declared difficulty tier.
    #[serde(default)]
    pub tier: Tier,
    /// Level the learner is working at.
    pub level: Level,
    /// Below-level retention check flag.
    #[serde(default)]
    pub is_foundation_check: bool,
    /// Level the retention check covers; defaults to `level - 1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_level: Option<Level>,
    /// Capstone scenario flag.
    #[serde(default)]
    pub is_capstone: bool,
}

impl ExerciseResult {
    /// A plain standard-tier result with no flags set.
    pub fn standard(exercise_id: impl Into<String>, level: Level, passed: bool, total_score: f64) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            is_curveball: false,
            curveball_score: None,
            curveball_type: None,
            passed,
            total_score,
            context_tag: None,
            tier: Tier::Standard,
            level,
            is_foundation_check: false,
            check_level: None,
            is_capstone: false,
        }
    }
}
