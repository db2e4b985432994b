//! Output formatting utilities.

use mastery_core::{EvidenceRecord, VerificationStatus};
use mastery_engine::{Gap, RingView};
use serde::Serialize;

/// Prints any value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the status table header.
#[allow(clippy::print_literal)]
pub fn print_status_header() {
    println!(
        "{:<6} {:<12} {:>10} {:>8} {:>6} {:<12} {:<25} {}",
        "LEVEL", "STATUS", "FOUNDATION", "BREADTH", "DEPTH", "APPLICATION", "LAST_ACTIVITY", "CONFIRMED_AT"
    );
    println!("{}", "-".repeat(110));
}

/// Formats a status row as a table row.
pub fn format_status_row(status: &VerificationStatus) -> String {
    format!(
        "{:<6} {:<12} {:>10.2} {:>8} {:>6} {:<12} {:<25} {}",
        status.target_level,
        status.status.as_str(),
        status.foundation_score,
        status.breadth_count,
        status.depth_count,
        if status.application_passed { "passed" } else { "-" },
        status.last_activity_at.to_rfc3339(),
        status
            .confirmed_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    )
}

/// Prints the evidence table header.
#[allow(clippy::print_literal)]
pub fn print_evidence_header() {
    println!(
        "{:<5} {:<30} {:<6} {:<12} {:<15} {:>6} {:<7} {}",
        "SEQ", "EVIDENCE_ID", "LEVEL", "DIMENSION", "CONTEXT", "SCORE", "PASSED", "CREATED_AT"
    );
    println!("{}", "-".repeat(110));
}

/// Formats an evidence record as a table row.
pub fn format_evidence_row(record: &EvidenceRecord) -> String {
    format!(
        "{:<5} {:<30} {:<6} {:<12} {:<15} {:>6.2} {:<7} {}",
        record.seq,
        truncate(record.evidence_id.as_str(), 30),
        record.target_level,
        record.dimension.as_str(),
        record
            .context_tag
            .as_ref()
            .map(|t| truncate(t.as_str(), 15))
            .unwrap_or_else(|| "-".to_string()),
        record.score,
        if record.passed { "yes" } else { "no" },
        record.created_at.to_rfc3339()
    )
}

/// Prints ring views as a table.
#[allow(clippy::print_literal)]
pub fn print_rings(rings: &[RingView]) {
    println!(
        "{:<12} {:>8} {:>8} {:>5} {}",
        "DIMENSION", "CURRENT", "TARGET", "PCT", "MET"
    );
    println!("{}", "-".repeat(45));
    for ring in rings {
        println!(
            "{:<12} {:>8} {:>8} {:>4}% {}",
            ring.dimension.as_str(),
            ring.current,
            ring.target,
            ring.percentage,
            if ring.met { "yes" } else { "no" }
        );
    }
}

/// Prints gaps, one per line with a hint.
pub fn print_gaps(gaps: &[Gap]) {
    if gaps.is_empty() {
        println!("No gaps");
        return;
    }
    for gap in gaps {
        println!(
            "{:<12} {}/{} needed {}: {}",
            gap.dimension.as_str(),
            gap.current,
            gap.target,
            gap.needed,
            gap.message
        );
    }
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
