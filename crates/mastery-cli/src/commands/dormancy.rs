//! Dormancy command implementation.

use mastery_core::LearnerId;

use super::open_engine;
use crate::output;

pub fn run(
    journal: String,
    config: Option<String>,
    learner: LearnerId,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(&journal, config.as_deref(), true)?;
    let event = engine.check_dormancy(&learner)?;

    if json {
        output::print_json(&event)?;
        return Ok(());
    }
    match event {
        Some(event) => println!(
            "Level {} is now dormant ({} days inactive, was {})",
            event.level, event.inactive_days, event.previous
        ),
        None => println!("active"),
    }
    Ok(())
}
