//! Progress ring views: each dimension normalized against its target.

use mastery_core::{Dimension, DimensionTargets};
use serde::Serialize;

use crate::calculators::DimensionReport;

/// One dimension as a progress ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingView {
    /// Dimension shown.
    pub dimension: Dimension,
    /// Current value.
    pub current: f64,
    /// Target value.
    pub target: f64,
    /// Progress toward the target, 0 to 100.
    pub percentage: u32,
    /// Whether the target is met.
    pub met: bool,
}

fn percentage(current: f64, target: f64) -> u32 {
    if target <= 0.0 {
        return 100;
    }
    ((current / target) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// The four rings in evaluation order.
pub fn ring_data(report: &DimensionReport, targets: &DimensionTargets) -> Vec<RingView> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let current = report.current(dimension);
            let target = targets.get(dimension);
            RingView {
                dimension,
                current,
                target,
                percentage: percentage(current, target),
                met: report.is_met(dimension, targets),
            }
        })
        .collect()
}
