//! Gap detection: what a learner still needs for one level.

use mastery_core::{Dimension, EngineConfig, Level};
use serde::Serialize;

use crate::calculators::DimensionReport;

/// One unmet dimension and how to close it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    /// Dimension below target.
    pub dimension: Dimension,
    /// Current value on the target's scale.
    pub current: f64,
    /// Target value.
    pub target: f64,
    /// Further passed items suggested.
    pub needed: u32,
    /// Concrete suggestions: context tags for breadth, weak levels for foundation.
    pub suggestions: Vec<String>,
    /// Learner-facing hint.
    pub message: String,
}

fn foundation_gap(report: &DimensionReport, config: &EngineConfig) -> Gap {
    // Heuristic only: the ratio can need more than `min_checks` passes.
    let needed = config
        .foundation
        .min_checks
        .saturating_sub(report.foundation.passed)
        .max(1);

    let limit = config.foundation.max_suggestions;
    let untested = report
        .foundation
        .untested_levels(report.level)
        .take(limit)
        .map(|level| (0.0, level));
    let mut weak: Vec<(f64, Level)> = report
        .foundation
        .levels
        .iter()
        .filter(|t| t.ratio() < config.targets.foundation)
        .map(|t| (t.ratio(), t.level))
        .chain(untested)
        .collect();
    weak.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    weak.truncate(limit);

    Gap {
        dimension: Dimension::Foundation,
        current: report.foundation.score,
        target: config.targets.foundation,
        needed,
        suggestions: weak.iter().map(|(_, level)| format!("level {level}")).collect(),
        message: format!(
            "Pass {needed} more foundation check{} from levels below {}",
            plural(needed),
            report.level
        ),
    }
}

fn breadth_gap(report: &DimensionReport, config: &EngineConfig) -> Gap {
    let needed = config
        .targets
        .count(Dimension::Breadth)
        .saturating_sub(report.breadth.count);
    let suggestions: Vec<String> = report
        .breadth
        .uncovered
        .iter()
        .take(config.breadth.max_suggestions)
        .map(|t| t.as_str().to_string())
        .collect();
    let message = if suggestions.is_empty() {
        format!("Pass stretch exercises in {needed} new context{}", plural(needed))
    } else {
        format!(
            "Pass stretch exercises in {needed} new context{}, such as {}",
            plural(needed),
            suggestions.join(", ")
        )
    };
    Gap {
        dimension: Dimension::Breadth,
        current: report.breadth.count as f64,
        target: config.targets.breadth,
        needed,
        suggestions,
        message,
    }
}

fn depth_gap(report: &DimensionReport, config: &EngineConfig) -> Gap {
    let needed = config
        .targets
        .count(Dimension::Depth)
        .saturating_sub(report.depth.count);
    Gap {
        dimension: Dimension::Depth,
        current: report.depth.count as f64,
        target: config.targets.depth,
        needed,
        suggestions: Vec::new(),
        message: format!(
            "Pass {needed} more curveball scenario{} scoring at least {}/{}",
            plural(needed),
            config.depth.pass_score,
            config.depth.max_score
        ),
    }
}

fn application_gap(report: &DimensionReport, config: &EngineConfig) -> Gap {
    let needed = config
        .targets
        .count(Dimension::Application)
        .saturating_sub(report.application.passed_count)
        .max(1);
    Gap {
        dimension: Dimension::Application,
        current: report.application.passed_count as f64,
        target: config.targets.application,
        needed,
        suggestions: Vec::new(),
        message: "Attempt a capstone scenario".to_string(),
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Gaps for every unmet dimension, in evaluation order. Empty when all are met.
pub fn detect(report: &DimensionReport, config: &EngineConfig) -> Vec<Gap> {
    report
        .unmet(&config.targets)
        .into_iter()
        .map(|dimension| match dimension {
            Dimension::Foundation => foundation_gap(report, config),
            Dimension::Breadth => breadth_gap(report, config),
            Dimension::Depth => depth_gap(report, config),
            Dimension::Application => application_gap(report, config),
        })
        .collect()
}

/// Convenience for callers holding raw records.
pub fn detect_for(
    records: &[mastery_core::EvidenceRecord],
    level: Level,
    config: &EngineConfig,
) -> Vec<Gap> {
    detect(&DimensionReport::compute(records, level, config), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mastery_core::{ContextTag, EvidenceDraft, EvidenceRecord, LearnerId};

    fn seal(draft: EvidenceDraft) -> EvidenceRecord {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        EvidenceRecord::seal(draft, 0, at).unwrap()
    }

    fn learner() -> LearnerId {
        LearnerId::parse("l1").unwrap()
    }

    #[test]
    fn empty_ledger_reports_every_dimension() {
        let config = EngineConfig::default();
        let gaps = detect_for(&[], 3, &config);
        let dims: Vec<_> = gaps.iter().map(|g| g.dimension).collect();
        assert_eq!(dims, Dimension::ALL.to_vec());

        let foundation = &gaps[0];
        assert_eq!(foundation.needed, 2);
        assert_eq!(foundation.suggestions, vec!["level 1", "level 2"]);

        let breadth = &gaps[1];
        assert_eq!(breadth.needed, 5);
        assert_eq!(breadth.suggestions, vec!["formal", "informal", "technical"]);

        assert_eq!(gaps[2].needed, 3);
        assert_eq!(gaps[3].message, "Attempt a capstone scenario");
    }

    #[test]
    fn foundation_needs_at_least_one_more_check() {
        let config = EngineConfig::default();
        let records = vec![
            seal(EvidenceDraft::new(Dimension::Foundation, learner(), 1, 1.0, true)),
            seal(EvidenceDraft::new(Dimension::Foundation, learner(), 1, 1.0, true)),
            seal(EvidenceDraft::new(Dimension::Foundation, learner(), 2, 0.0, false)),
        ];
        let gaps = detect_for(&records, 3, &config);
        let foundation = gaps
            .iter()
            .find(|g| g.dimension == Dimension::Foundation)
            .unwrap();
        assert_eq!(foundation.needed, 1);
        assert_eq!(foundation.suggestions, vec!["level 2"]);
    }

    #[test]
    fn foundation_suggestions_are_capped_at_high_levels() {
        let config = EngineConfig::default();
        let records = vec![
            seal(EvidenceDraft::new(Dimension::Foundation, learner(), 1, 1.0, true)),
            seal(EvidenceDraft::new(Dimension::Foundation, learner(), 3, 0.0, false)),
        ];
        let gaps = detect_for(&records, 50_000_000, &config);
        let foundation = gaps
            .iter()
            .find(|g| g.dimension == Dimension::Foundation)
            .unwrap();
        assert_eq!(foundation.suggestions, vec!["level 2", "level 3", "level 4"]);
    }

    #[test]
    fn depth_reports_exact_remaining_count() {
        let config = EngineConfig::default();
        let records = vec![
            seal(EvidenceDraft::new(Dimension::Depth, learner(), 2, 4.0, true)),
            seal(EvidenceDraft::new(Dimension::Depth, learner(), 2, 2.0, false)),
        ];
        let gaps = detect_for(&records, 2, &config);
        let depth = gaps.iter().find(|g| g.dimension == Dimension::Depth).unwrap();
        assert_eq!(depth.needed, 2);
        assert_eq!(depth.current, 1.0);
    }

    #[test]
    fn fully_met_level_has_no_gaps() {
        let config = EngineConfig::default();
        let mut records = Vec::new();
        for tag in ["formal", "informal", "technical", "creative", "teaching"] {
            records.push(seal(
                EvidenceDraft::new(Dimension::Breadth, learner(), 1, 1.0, true)
                    .with_context_tag(ContextTag::parse(tag).unwrap()),
            ));
        }
        for _ in 0..3 {
            records.push(seal(EvidenceDraft::new(Dimension::Depth, learner(), 1, 4.0, true)));
        }
        records.push(seal(EvidenceDraft::new(
            Dimension::Application,
            learner(),
            1,
            1.0,
            true,
        )));
        assert!(detect_for(&records, 1, &config).is_empty());
    }
}
