//! Submit command implementation.

use std::io::{self, Read};

use mastery_core::{ExerciseResult, LearnerId};
use mastery_engine::PromotionResult;

use super::open_engine;
use crate::output;

pub fn run(
    journal: String,
    config: Option<String>,
    learner: LearnerId,
    input: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Read JSON from file or stdin
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let result: ExerciseResult = serde_json::from_str(&json_str)
        .map_err(|e| format!("Invalid exercise result: {}", e))?;

    let mut engine = open_engine(&journal, config.as_deref(), false)?;
    let outcome = engine.process(&learner, &result)?;

    if json {
        output::print_json(&outcome)?;
        return Ok(());
    }

    if outcome.evidence_recorded.is_empty() {
        println!("No evidence recorded");
    }
    for (dimension, id) in outcome.evidence_recorded.iter().zip(&outcome.evidence_ids) {
        println!("Recorded {} evidence {}", dimension, id);
    }
    match &outcome.promotion {
        PromotionResult::Promoted(event) => {
            println!("{} (+{} XP)", event.summary, event.xp_bonus);
        }
        PromotionResult::NotYet { unmet, .. } => {
            let unmet: Vec<&str> = unmet.iter().map(|d| d.as_str()).collect();
            println!("Level {} not yet confirmed: {} below target", result.level, unmet.join(", "));
        }
        other => println!("Level {}: {}", result.level, other.label()),
    }
    Ok(())
}
