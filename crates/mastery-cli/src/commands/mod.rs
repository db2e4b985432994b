//! Command implementations and the helpers they share.

pub mod assign;
pub mod dormancy;
pub mod evaluate;
pub mod gaps;
pub mod log;
pub mod record;
pub mod reset;
pub mod return_flow;
pub mod rings;
pub mod status;
pub mod submit;
pub mod verify;

use std::path::Path;

use mastery_core::EngineConfig;
use mastery_engine::MasteryEngine;
use mastery_store::JournalStore;
use tracing::warn;

use crate::path;

/// Loads the engine configuration. A missing file means defaults.
pub fn load_config(config: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match config {
        Some(file) if Path::new(file).exists() => {
            Ok(EngineConfig::load(file).map_err(|e| format!("Invalid config {}: {}", file, e))?)
        }
        Some(file) => {
            warn!(config = file, "config file not found; using defaults");
            Ok(EngineConfig::default())
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Opens an engine over a journal.
///
/// `must_exist` is set by commands that only read.
pub fn open_engine(
    journal: &str,
    config: Option<&str>,
    must_exist: bool,
) -> Result<MasteryEngine<JournalStore>, Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(journal, must_exist)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let config = load_config(config)?;
    let store = JournalStore::open(&journal_path).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to open journal file: {}: {}", sanitized, e)
    })?;
    Ok(MasteryEngine::new(store, config))
}
