//! Rings command implementation.

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
    let engine = open_engine(&journal, config.as_deref(), true)?;
    let rings = engine.get_ring_data(&learner, level)?;

    if json {
        output::print_json(&rings)?;
    } else {
        output::print_rings(&rings);
    }
    Ok(())
}
