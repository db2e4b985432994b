use serde_json::Value;

/// Ledger entry JSON payload type.
///
/// Every entry is a JSON object tagged by `entry_type`. The journal stores
/// entries as-is; typing happens in `mastery-store`.
pub type EntryJson = Value;

/// Returns the `entry_type` tag of an entry, if present.
pub fn entry_type(value: &EntryJson) -> Option<&str> {
    value.get("entry_type").and_then(|v| v.as_str())
}

/// Basic structural check: an object carrying an `entry_type` string.
pub fn is_valid_entry_structure(value: &EntryJson) -> bool {
    value.is_object() && entry_type(value).is_some()
}
