//! Log command implementation.

use mastery_core::{LearnerId, Level};

use super::open_engine;
use crate::output;

pub fn run(
    journal: String,
    config: Option<String>,
    learner: LearnerId,
    level: Option<Level>,
    limit: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(&journal, config.as_deref(), true)?;
    let records = engine.get_evidence_log(&learner, level, limit)?;

    if json {
        // one record per line, like a journal listing
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
        return Ok(());
    }
    output::print_evidence_header();
    for record in &records {
        println!("{}", output::format_evidence_row(record));
    }
    Ok(())
}
