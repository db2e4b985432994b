//! Verify command implementation.

use mastery_journal::{entry_type, verify_evidence_entry, JournalReader, ReadMode};
use serde_json::json;

use crate::output::truncate;
use crate::path;

pub fn run(journal: String, strict: bool, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&journal, true)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to open journal file: {}: {}", sanitized, e)
    })?;

    let mut all_ok = true;
    let mut results = Vec::new();
    let mut other_entries = 0u64;

    while let Some(entry) = reader.read_entry()? {
        let evidence_id = entry
            .get("evidence_id")
            .and_then(|v| v.as_str())
            .unwrap_or("?")
            .to_string();
        match verify_evidence_entry(&entry) {
            Ok(Some(ok)) => {
                all_ok &= ok;
                results.push((evidence_id, if ok { "ok" } else { "mismatch" }));
            }
            Ok(None) => {
                other_entries += 1;
                if entry_type(&entry).is_none() && !json_output {
                    eprintln!("Entry without entry_type skipped");
                }
            }
            Err(e) => {
                all_ok = false;
                if !json_output {
                    eprintln!("Error verifying evidence {}: {}", evidence_id, e);
                }
                results.push((evidence_id, "invalid"));
            }
        }
    }

    if json_output {
        let json_results: Vec<_> = results
            .iter()
            .map(|(id, verdict)| json!({ "evidence_id": id, "verdict": verdict }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "evidence": json_results,
                "other_entries": other_entries,
                "ok": all_ok,
            }))?
        );
    } else {
        println!("{:<50} {}", "EVIDENCE_ID", "VERDICT");
        println!("{}", "-".repeat(60));
        for (id, verdict) in &results {
            println!("{:<50} {}", truncate(id, 50), verdict);
        }
        println!("{} evidence, {} other entries", results.len(), other_entries);
    }

    if strict && !all_ok {
        std::process::exit(1);
    }

    Ok(())
}
