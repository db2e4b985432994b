//! Evaluate command implementation.

use mastery_core::{LearnerId, Level};
use mastery_engine::PromotionResult;

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
    let result = engine.evaluate(&learner, level)?;

    if json {
        output::print_json(&result)?;
        return Ok(());
    }
    match &result {
        PromotionResult::Promoted(event) => {
            println!("{} (+{} XP)", event.summary, event.xp_bonus);
        }
        PromotionResult::NotYet { unmet, .. } => {
            let unmet: Vec<&str> = unmet.iter().map(|d| d.as_str()).collect();
            println!("not_yet: {} below target", unmet.join(", "));
        }
        other => println!("{}", other.label()),
    }
    Ok(())
}
