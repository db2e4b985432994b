//! Return command implementation.

use mastery_core::LearnerId;
use mastery_engine::ReturnOutcome;

use super::open_engine;
use crate::output;

pub fn run(
    journal: String,
    config: Option<String>,
    learner: LearnerId,
    warmup_passed: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(&journal, config.as_deref(), true)?;
    let outcome = engine.handle_return(&learner, warmup_passed)?;

    if json {
        output::print_json(&outcome)?;
        return Ok(());
    }
    println!("{}", outcome.label());
    if let ReturnOutcome::RefresherOffered { refresher, .. } = &outcome {
        output::print_gaps(refresher);
    }
    Ok(())
}
