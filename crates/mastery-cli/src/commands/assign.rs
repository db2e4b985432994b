//! Assign command implementation.

use mastery_core::{LearnerId, Level};

use super::open_engine;
use crate::output;

pub fn run(
    journal: String,
    config: Option<String>,
    learner: LearnerId,
    level: Level,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(&journal, config.as_deref(), false)?;
    let status = engine.assign_level(&learner, level)?;

    if json {
        output::print_json(&status)?;
    } else {
        output::print_status_header();
        println!("{}", output::format_status_row(&status));
    }
    Ok(())
}
