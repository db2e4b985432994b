//! Status command implementation.

use mastery_core::{LearnerId, Level};

use super::open_engine;
use crate::output;

pub fn run(
    journal: String,
    config: Option<String>,
    learner: LearnerId,
    level: Option<Level>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(&journal, config.as_deref(), true)?;
    let rows = engine.get_status(&learner, level)?;

    if json {
        output::print_json(&rows)?;
        return Ok(());
    }
    if rows.is_empty() {
        println!("No status for {}", learner);
        return Ok(());
    }
    output::print_status_header();
    for row in &rows {
        println!("{}", output::format_status_row(row));
    }
    Ok(())
}
