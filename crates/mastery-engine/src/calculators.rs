//! Dimension calculators.
//!
//! Pure, read-only functions over a learner's ledger records. Callers pass
//! the records of a single learner; the calculators select the dimension and
//! level they need.

use std::collections::{BTreeMap, BTreeSet};

use mastery_core::{
    ContextTag, Dimension, DimensionSnapshot, DimensionTargets, EngineConfig, EvidenceRecord,
    Level,
};
use serde::Serialize;

/// Denominator used for a below-level with no recorded foundation checks.
///
/// An untested level counts as one check that has not been passed yet, so a
/// learner cannot reach a high foundation score by being tested on only some
/// of the levels below their target.
pub const UNTESTED_LEVEL_DENOMINATOR: u32 = 1;

/// Foundation score reported for level 1, which has nothing below it.
pub const NO_LOWER_LEVELS_SCORE: f64 = 1.0;

/// Rounds to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Foundation check counts for one below-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelTally {
    /// Check level.
    pub level: Level,
    /// Passed checks at this level.
    pub passed: u32,
    /// Recorded checks at this level.
    pub recorded: u32,
}

impl LevelTally {
    /// Denominator this level contributes to the foundation ratio.
    pub fn denominator(&self) -> u32 {
        self.recorded.max(UNTESTED_LEVEL_DENOMINATOR)
    }

    /// Pass ratio of this level alone.
    pub fn ratio(&self) -> f64 {
        self.passed as f64 / self.denominator() as f64
    }
}

/// Foundation dimension result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoundationScore {
    /// Σpassed / Σdenominator over levels `1..target`, two decimals.
    pub score: f64,
    /// Total passed checks across the below-levels.
    pub passed: u32,
    /// Tallies of the below-levels with at least one recorded check, lowest first.
    pub levels: Vec<LevelTally>,
    /// Below-levels with no recorded check.
    pub untested: u32,
}

impl FoundationScore {
    /// Below-levels of `target_level` with no recorded check, lowest first.
    pub fn untested_levels(&self, target_level: Level) -> impl Iterator<Item = Level> + '_ {
        let mut tested = self.levels.iter().map(|t| t.level).peekable();
        (1..target_level).filter(move |level| {
            while tested.next_if(|t| t < level).is_some() {}
            tested.next_if_eq(level).is_none()
        })
    }
}

/// Breadth dimension result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadthCoverage {
    /// Distinct context tags with at least one passed breadth record.
    pub count: u32,
    /// The covered tags, sorted.
    pub covered: Vec<ContextTag>,
    /// Tags of the configured universe not yet covered, in universe order.
    pub uncovered: Vec<ContextTag>,
}

/// Depth dimension result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthTally {
    /// Passed curveball records.
    pub count: u32,
    /// Scores of every curveball attempt at this level, in ledger order.
    pub scores: Vec<f64>,
}

/// Application dimension result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicationTally {
    /// Passed capstone records.
    pub passed_count: u32,
    /// Whether the passed count reaches the target.
    pub met: bool,
}

fn rows_at(
    records: &[EvidenceRecord],
    dimension: Dimension,
    level: Level,
) -> impl Iterator<Item = &EvidenceRecord> {
    records
        .iter()
        .filter(move |r| r.dimension == dimension && r.target_level == level)
}

/// Foundation: share of passed retention checks over every level below `target_level`.
pub fn foundation(records: &[EvidenceRecord], target_level: Level) -> FoundationScore {
    if target_level <= 1 {
        return FoundationScore {
            score: NO_LOWER_LEVELS_SCORE,
            passed: 0,
            levels: Vec::new(),
            untested: 0,
        };
    }

    let mut tallies: BTreeMap<Level, LevelTally> = BTreeMap::new();
    for row in records
        .iter()
        .filter(|r| r.dimension == Dimension::Foundation)
        .filter(|r| (1..target_level).contains(&r.target_level))
    {
        let tally = tallies.entry(row.target_level).or_insert(LevelTally {
            level: row.target_level,
            passed: 0,
            recorded: 0,
        });
        tally.recorded += 1;
        if row.passed {
            tally.passed += 1;
        }
    }
    let levels: Vec<LevelTally> = tallies.into_values().collect();

    let untested = target_level - 1 - levels.len() as u32;
    let passed: u32 = levels.iter().map(|t| t.passed).sum();
    let denominator = levels
        .iter()
        .map(|t| u64::from(t.denominator()))
        .sum::<u64>()
        + u64::from(untested) * u64::from(UNTESTED_LEVEL_DENOMINATOR);

    FoundationScore {
        score: round2(passed as f64 / denominator as f64),
        passed,
        levels,
        untested,
    }
}

/// Breadth: distinct context tags passed at this level.
pub fn breadth(
    records: &[EvidenceRecord],
    target_level: Level,
    universe: &[ContextTag],
) -> BreadthCoverage {
    let covered: BTreeSet<ContextTag> = rows_at(records, Dimension::Breadth, target_level)
        .filter(|r| r.passed)
        .filter_map(|r| r.context_tag.clone())
        .collect();

    let uncovered = universe
        .iter()
        .filter(|tag| !covered.contains(*tag))
        .cloned()
        .collect();

    BreadthCoverage {
        count: covered.len() as u32,
        covered: covered.into_iter().collect(),
        uncovered,
    }
}

/// Depth: passed curveball scenarios at this level.
pub fn depth(records: &[EvidenceRecord], target_level: Level) -> DepthTally {
    let mut tally = DepthTally {
        count: 0,
        scores: Vec::new(),
    };
    for row in rows_at(records, Dimension::Depth, target_level) {
        tally.scores.push(row.score);
        if row.passed {
            tally.count += 1;
        }
    }
    tally
}

/// Application: passed capstones at this level against the target count.
pub fn application(records: &[EvidenceRecord], target_level: Level, target: u32) -> ApplicationTally {
    let passed_count = rows_at(records, Dimension::Application, target_level)
        .filter(|r| r.passed)
        .count() as u32;
    ApplicationTally {
        passed_count,
        met: passed_count >= target,
    }
}

/// All four dimensions for one (learner, level).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionReport {
    /// Level the report is for.
    pub level: Level,
    /// Foundation result.
    pub foundation: FoundationScore,
    /// Breadth result.
    pub breadth: BreadthCoverage,
    /// Depth result.
    pub depth: DepthTally,
    /// Application result.
    pub application: ApplicationTally,
}

impl DimensionReport {
    /// Runs the four calculators.
    pub fn compute(records: &[EvidenceRecord], level: Level, config: &EngineConfig) -> Self {
        Self {
            level,
            foundation: foundation(records, level),
            breadth: breadth(records, level, &config.breadth.context_tags),
            depth: depth(records, level),
            application: application(
                records,
                level,
                config.targets.count(Dimension::Application),
            ),
        }
    }

    /// Values to cache on the status row.
    pub fn snapshot(&self) -> DimensionSnapshot {
        DimensionSnapshot {
            foundation_score: self.foundation.score,
            breadth_count: self.breadth.count,
            depth_count: self.depth.count,
            application_passed: self.application.met,
        }
    }

    /// Current value of one dimension on its target's scale.
    pub fn current(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Foundation => self.foundation.score,
            Dimension::Breadth => self.breadth.count as f64,
            Dimension::Depth => self.depth.count as f64,
            Dimension::Application => self.application.passed_count as f64,
        }
    }

    /// Whether one dimension meets its target.
    pub fn is_met(&self, dimension: Dimension, targets: &DimensionTargets) -> bool {
        match dimension {
            Dimension::Application => self.application.met,
            other => self.current(other) >= targets.get(other),
        }
    }

    /// Dimensions below target, in evaluation order.
    pub fn unmet(&self, targets: &DimensionTargets) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|d| !self.is_met(*d, targets))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mastery_core::{EvidenceDraft, LearnerId};

    fn record(dimension: Dimension, level: Level, passed: bool) -> EvidenceRecord {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let draft = EvidenceDraft::new(dimension, LearnerId::parse("l1").unwrap(), level, 1.0, passed);
        EvidenceRecord::seal(draft, 0, at).unwrap()
    }

    fn tagged(level: Level, tag: &str, passed: bool) -> EvidenceRecord {
        let mut r = record(Dimension::Breadth, level, passed);
        r.context_tag = Some(ContextTag::parse(tag).unwrap());
        r
    }

    #[test]
    fn foundation_untested_level_counts_against_ratio() {
        // level 1: 2/2 passed, level 2: nothing recorded, target 3
        let records = vec![
            record(Dimension::Foundation, 1, true),
            record(Dimension::Foundation, 1, true),
        ];
        let score = foundation(&records, 3);
        assert_eq!(score.score, 0.67);
        assert_eq!(score.passed, 2);
        assert_eq!(score.levels.len(), 1);
        assert_eq!(score.untested, 1);
        assert_eq!(score.untested_levels(3).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn foundation_cost_does_not_grow_with_level() {
        let records = vec![
            record(Dimension::Foundation, 2, true),
            record(Dimension::Foundation, 5, false),
        ];
        let score = foundation(&records, u32::MAX);
        assert_eq!(score.levels.len(), 2);
        assert_eq!(score.untested, u32::MAX - 3);
        assert_eq!(score.score, 0.0);
        assert_eq!(
            score.untested_levels(u32::MAX).take(4).collect::<Vec<_>>(),
            vec![1, 3, 4, 6]
        );
    }

    #[test]
    fn foundation_level_one_is_complete() {
        assert_eq!(foundation(&[], 1).score, 1.0);
        assert_eq!(foundation(&[], 0).score, 1.0);
    }

    #[test]
    fn foundation_ignores_target_level_and_other_dimensions() {
        let records = vec![
            record(Dimension::Foundation, 1, true),
            record(Dimension::Foundation, 2, false),
            record(Dimension::Foundation, 3, true),
            record(Dimension::Depth, 1, true),
        ];
        let score = foundation(&records, 3);
        assert_eq!(score.score, 0.5);
        assert_eq!(score.levels.len(), 2);
    }

    #[test]
    fn foundation_without_any_checks_is_zero() {
        assert_eq!(foundation(&[], 4).score, 0.0);
    }

    #[test]
    fn breadth_counts_distinct_passed_tags() {
        let records = vec![
            tagged(3, "formal", true),
            tagged(3, "informal", true),
            tagged(3, "formal", true),
            tagged(3, "creative", true),
            tagged(3, "teaching", true),
            tagged(3, "ambiguous", false),
            tagged(2, "technical", true),
        ];
        let universe = EngineConfig::default().breadth.context_tags;
        let coverage = breadth(&records, 3, &universe);
        assert_eq!(coverage.count, 4);
        assert_eq!(coverage.uncovered.len(), 4);
        assert!(coverage
            .uncovered
            .iter()
            .any(|t| t.as_str() == "ambiguous"));
        assert!(coverage.uncovered.iter().any(|t| t.as_str() == "technical"));
    }

    #[test]
    fn breadth_counts_tags_outside_universe() {
        let records = vec![tagged(3, "negotiation", true)];
        let universe = EngineConfig::default().breadth.context_tags;
        let coverage = breadth(&records, 3, &universe);
        assert_eq!(coverage.count, 1);
        assert_eq!(coverage.uncovered.len(), 8);
    }

    #[test]
    fn depth_counts_passes_and_keeps_all_scores() {
        let mut fail = record(Dimension::Depth, 3, false);
        fail.score = 2.5;
        let mut pass = record(Dimension::Depth, 3, true);
        pass.score = 4.0;
        let tally = depth(&[fail, pass], 3);
        assert_eq!(tally.count, 1);
        assert_eq!(tally.scores, vec![2.5, 4.0]);
    }

    #[test]
    fn application_is_binary_against_target() {
        let records = vec![
            record(Dimension::Application, 3, false),
            record(Dimension::Application, 3, true),
        ];
        assert!(application(&records, 3, 1).met);
        assert!(!application(&records, 3, 2).met);
        assert!(!application(&records, 4, 1).met);
    }

    #[test]
    fn report_lists_unmet_dimensions_in_order() {
        let config = EngineConfig::default();
        let report = DimensionReport::compute(&[], 1, &config);
        assert_eq!(
            report.unmet(&config.targets),
            vec![Dimension::Breadth, Dimension::Depth, Dimension::Application]
        );
    }
}
