//! Process-wide engine configuration.
//!
//! Targets and thresholds are data, not code: a program tier with different
//! requirements ships a different TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dimension::Dimension;
use crate::exercise::Tier;
use crate::identifiers::ContextTag;

/// Errors while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Promotion thresholds keyed by dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionTargets {
    /// Minimum fraction of below-level foundation checks passed.
    pub foundation: f64,
    /// Minimum distinct context tags passed at elevated difficulty.
    pub breadth: f64,
    /// Minimum passed curveball scenarios.
    pub depth: f64,
    /// Minimum passed capstones.
    pub application: f64,
}

impl DimensionTargets {
    /// Threshold for one dimension.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Foundation => self.foundation,
            Dimension::Breadth => self.breadth,
            Dimension::Depth => self.depth,
            Dimension::Application => self.application,
        }
    }

    /// Threshold of a count dimension, rounded up to a whole count.
    pub fn count(&self, dimension: Dimension) -> u32 {
        self.get(dimension).ceil().max(0.0) as u32
    }
}

impl Default for DimensionTargets {
    fn default() -> Self {
        Self {
            foundation: 0.80,
            breadth: 5.0,
            depth: 3.0,
            application: 1.0,
        }
    }
}

/// Foundation gap heuristic settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationConfig {
    /// Checks a learner should have passed before the ratio is meaningful.
    pub min_checks: u32,
    /// How many weak levels a gap suggests at most.
    pub max_suggestions: usize,
}

impl Default for FoundationConfig {
    fn default() -> Self {
        Self {
            min_checks: 2,
            max_suggestions: 3,
        }
    }
}

/// Breadth classification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadthConfig {
    /// Tiers that count as elevated difficulty.
    pub elevated_tiers: Vec<Tier>,
    /// The fixed universe of context tags used for coverage suggestions.
    pub context_tags: Vec<ContextTag>,
    /// How many uncovered tags a gap suggests at most.
    pub max_suggestions: usize,
}

impl Default for BreadthConfig {
    fn default() -> Self {
        let context_tags = [
            "formal",
            "informal",
            "technical",
            "creative",
            "collaborative",
            "time_pressured",
            "ambiguous",
            "teaching",
        ]
        .into_iter()
        .map(|t| ContextTag::new(t.to_string()))
        .collect();
        Self {
            elevated_tiers: vec![Tier::Stretch, Tier::Elite],
            context_tags,
            max_suggestions: 3,
        }
    }
}

/// Curveball scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Minimum curveball score that counts as a pass.
    pub pass_score: f64,
    /// Top of the curveball scale.
    pub max_score: f64,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            pass_score: 3.5,
            max_score: 5.0,
        }
    }
}

/// Promotion reward settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionConfig {
    /// XP awarded with every promotion event.
    pub xp_bonus: u32,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self { xp_bonus: 50 }
    }
}

/// Whether confirmed rows can lapse into dormancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmedPolicy {
    /// Certification is permanent once earned.
    #[default]
    Exempt,
    /// Certification lapses after `confirmed_lapse_days` of inactivity.
    Lapse,
}

/// Longest inactivity window accepted in configuration, about a century.
pub const MAX_DORMANCY_DAYS: i64 = 36_500;

/// Inactivity settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DormancyConfig {
    /// Days without activity after which a provisional row goes dormant.
    pub inactivity_days: i64,
    /// Treatment of confirmed rows.
    pub confirmed_policy: ConfirmedPolicy,
    /// Days without activity after which a confirmed row lapses (`lapse` only).
    pub confirmed_lapse_days: i64,
}

impl Default for DormancyConfig {
    fn default() -> Self {
        Self {
            inactivity_days: 30,
            confirmed_policy: ConfirmedPolicy::Exempt,
            confirmed_lapse_days: 365,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Promotion thresholds.
    pub targets: DimensionTargets,
    /// Foundation settings.
    pub foundation: FoundationConfig,
    /// Breadth settings.
    pub breadth: BreadthConfig,
    /// Depth settings.
    pub depth: DepthConfig,
    /// Promotion settings.
    pub promotion: PromotionConfig,
    /// Dormancy settings.
    pub dormancy: DormancyConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for dimension in Dimension::ALL {
            let target = self.targets.get(dimension);
            if !target.is_finite() || target < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "target for {dimension} must be a non-negative number, got {target}"
                )));
            }
        }
        if self.targets.foundation > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "foundation target is a ratio and cannot exceed 1.0, got {}",
                self.targets.foundation
            )));
        }
        if !self.depth.pass_score.is_finite()
            || !self.depth.max_score.is_finite()
            || self.depth.max_score <= 0.0
            || self.depth.pass_score > self.depth.max_score
        {
            return Err(ConfigError::Invalid(format!(
                "curveball pass score {} must not exceed max score {}",
                self.depth.pass_score, self.depth.max_score
            )));
        }
        if self.dormancy.inactivity_days <= 0 {
            return Err(ConfigError::Invalid(
                "dormancy.inactivity_days must be positive".to_string(),
            ));
        }
        for (key, days) in [
            ("inactivity_days", self.dormancy.inactivity_days),
            ("confirmed_lapse_days", self.dormancy.confirmed_lapse_days),
        ] {
            if days > MAX_DORMANCY_DAYS {
                return Err(ConfigError::Invalid(format!(
                    "dormancy.{key} must be at most {MAX_DORMANCY_DAYS}, got {days}"
                )));
            }
        }
        if self.dormancy.confirmed_policy == ConfirmedPolicy::Lapse
            && self.dormancy.confirmed_lapse_days <= 0
        {
            return Err(ConfigError::Invalid(
                "dormancy.confirmed_lapse_days must be positive under the lapse policy"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
