use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// One of the four independent evidence axes gating promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Retention of skills from every level strictly below the target.
    Foundation,
    /// Competency across distinct contexts at elevated difficulty.
    Breadth,
    /// Resilience on adversarial ("curveball") scenarios.
    Depth,
    /// Open-ended capstone application.
    Application,
}

impl Dimension {
    /// All dimensions in evaluation order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Foundation,
        Dimension::Breadth,
        Dimension::Depth,
        Dimension::Application,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Foundation => "foundation",
            Dimension::Breadth => "breadth",
            Dimension::Depth => "depth",
            Dimension::Application => "application",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ValidationError::PatternMismatch {
                field: "dimension",
                value: s.to_string(),
            })
    }
}

/// Kind of evidence recorded on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    /// A below-level retention check.
    FoundationCheck,
    /// A pass at elevated difficulty in a tagged context.
    ContextPass,
    /// An adversarial scenario attempt.
    Curveball,
    /// A capstone scenario attempt.
    Capstone,
}

impl EvidenceType {
    /// The evidence type each dimension records by default.
    pub fn for_dimension(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Foundation => EvidenceType::FoundationCheck,
            Dimension::Breadth => EvidenceType::ContextPass,
            Dimension::Depth => EvidenceType::Curveball,
            Dimension::Application => EvidenceType::Capstone,
        }
    }

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceType::FoundationCheck => "foundation_check",
            EvidenceType::ContextPass => "context_pass",
            EvidenceType::Curveball => "curveball",
            EvidenceType::Capstone => "capstone",
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
