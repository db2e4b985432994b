//! Verification helpers for journal entries.

use crate::entry::{entry_type, EntryJson};
use crate::errors::JournalError;
use mastery_core::compute_evidence_id;

/// Verifies an evidence entry against its claimed `evidence_id`.
///
/// Returns `Ok(None)` for entries that are not evidence, since only evidence
/// carries a content-derived ID.
pub fn verify_evidence_entry(entry: &EntryJson) -> Result<Option<bool>, JournalError> {
    if entry_type(entry) != Some("evidence") {
        return Ok(None);
    }

    let claimed = entry
        .get("evidence_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| JournalError::Entry("missing or invalid evidence_id".to_string()))?;

    // The tag is journal framing, not record content.
    let mut record = entry.clone();
    if let Some(map) = record.as_object_mut() {
        map.remove("entry_type");
    }

    let computed = compute_evidence_id(&record)
        .map_err(|e| JournalError::Entry(format!("evidence ID computation failed: {}", e)))?;

    Ok(Some(computed.as_str() == claimed))
}
