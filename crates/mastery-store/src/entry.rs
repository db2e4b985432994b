//! Typed ledger entries.

use chrono::{DateTime, Utc};
use mastery_core::{EvidenceRecord, LearnerId, Level, VerificationStatus};
use mastery_journal::{entry_type, EntryJson};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error that can occur when parsing or encoding an entry.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON (de)serialization error.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Administrative removal of a status row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReset {
    /// Learner whose row is removed.
    pub learner_id: LearnerId,
    /// Level of the removed row.
    pub target_level: Level,
    /// When the reset happened.
    pub reset_at: DateTime<Utc>,
}

/// Typed representation of a ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", rename_all = "snake_case")]
pub enum LedgerEntry {
    /// An immutable evidence record.
    Evidence(EvidenceRecord),
    /// A full snapshot of a status row.
    Status(VerificationStatus),
    /// Tombstone for a status row.
    StatusReset(StatusReset),
    /// Unknown entry type; kept so newer journals remain readable.
    #[serde(skip)]
    Unknown(EntryJson),
}

/// Parses a JSON entry into a typed entry.
///
/// Inspects the `entry_type` field to pick the variant. Entry types this
/// version does not know fall back to `LedgerEntry::Unknown`; a known type
/// with a malformed body is an error.
pub fn parse_entry(json: &EntryJson) -> Result<LedgerEntry, ParseError> {
    match entry_type(json) {
        Some("evidence") | Some("status") | Some("status_reset") => {
            Ok(serde_json::from_value(json.clone())?)
        }
        _ => Ok(LedgerEntry::Unknown(json.clone())),
    }
}

/// Encodes a typed entry for the journal.
pub fn to_entry_json(entry: &LedgerEntry) -> Result<EntryJson, ParseError> {
    match entry {
        LedgerEntry::Unknown(json) => Ok(json.clone()),
        other => Ok(serde_json::to_value(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn status_entry_is_tagged() {
        let row = VerificationStatus::placed(LearnerId::parse("l1").unwrap(), 2, at());
        let json = to_entry_json(&LedgerEntry::Status(row.clone())).unwrap();
        assert_eq!(json["entry_type"], "status");
        assert_eq!(json["status"], "provisional");
        assert_eq!(parse_entry(&json).unwrap(), LedgerEntry::Status(row));
    }

    #[test]
    fn reset_entry_round_trips() {
        let reset = StatusReset {
            learner_id: LearnerId::parse("l1").unwrap(),
            target_level: 4,
            reset_at: at(),
        };
        let json = to_entry_json(&LedgerEntry::StatusReset(reset.clone())).unwrap();
        assert_eq!(json["entry_type"], "status_reset");
        assert_eq!(parse_entry(&json).unwrap(), LedgerEntry::StatusReset(reset));
    }

    #[test]
    fn unknown_type_is_preserved() {
        let json = json!({"entry_type": "streak_bonus", "days": 7});
        assert_eq!(parse_entry(&json).unwrap(), LedgerEntry::Unknown(json.clone()));
        assert_eq!(to_entry_json(&LedgerEntry::Unknown(json.clone())).unwrap(), json);
    }

    #[test]
    fn malformed_known_type_is_an_error() {
        let json = json!({"entry_type": "status", "learner_id": "l1"});
        assert!(parse_entry(&json).is_err());
    }
}
