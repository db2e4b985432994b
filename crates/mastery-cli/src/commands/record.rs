//! Record command implementation.

use mastery_core::{ContextTag, Dimension, EvidenceDraft, LearnerId, Level};

use super::open_engine;
use crate::output;

/// Evidence fields given on the command line.
pub struct Args {
    pub learner: LearnerId,
    pub level: Level,
    pub dimension: Dimension,
    pub score: f64,
    pub passed: bool,
    pub context_tag: Option<String>,
    pub exercise: Option<String>,
}

pub fn run(
    journal: String,
    config: Option<String>,
    args: Args,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut draft = EvidenceDraft::new(args.dimension, args.learner, args.level, args.score, args.passed);
    if let Some(tag) = args.context_tag {
        let tag = ContextTag::parse(tag).map_err(|e| format!("Invalid context tag: {}", e))?;
        draft = draft.with_context_tag(tag);
    }
    if let Some(exercise) = args.exercise {
        draft = draft.with_source_exercise(exercise);
    }

    let mut engine = open_engine(&journal, config.as_deref(), false)?;
    let record = engine.record_evidence(draft)?;

    if json {
        output::print_json(&record)?;
    } else {
        output::print_evidence_header();
        println!("{}", output::format_evidence_row(&record));
    }
    Ok(())
}
