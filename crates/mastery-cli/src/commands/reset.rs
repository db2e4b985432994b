//! Reset command implementation.

use mastery_core::{LearnerId, Level};
use serde_json::json;

use super::open_engine;
use crate::output;

pub fn run(
    journal: String,
    config: Option<String>,
    learner: LearnerId,
    level: Level,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(&journal, config.as_deref(), true)?;
    let removed = engine.reset(&learner, level)?;

    if json {
        output::print_json(&json!({
            "learner_id": learner,
            "level": level,
            "removed": removed,
        }))?;
    } else if removed {
        println!("Reset level {} for {}", level, learner);
    } else {
        println!("No status for {} at level {}", learner, level);
    }
    Ok(())
}
