use thiserror::Error;

/// Errors raised while reading or writing a journal.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file does not start with a mastery journal header.
    #[error("not a mastery journal: {0}")]
    Header(String),
    /// A non-empty file too short to hold a header.
    #[error("file holds {len} bytes, too few for a journal header")]
    ShortFile {
        /// File length.
        len: u64,
    },
    /// A frame header is malformed.
    #[error("bad frame at offset {offset}: {reason}")]
    Frame {
        /// Frame start.
        offset: u64,
        /// What is wrong.
        reason: String,
    },
    /// A complete frame whose payload does not match its digest.
    #[error("payload digest mismatch in frame at offset {offset}")]
    Checksum {
        /// Frame start.
        offset: u64,
    },
    /// A frame cut short by the end of the file (strict mode).
    #[error("frame at offset {offset} is cut short")]
    Truncated {
        /// Frame start.
        offset: u64,
    },
    /// A payload larger than the format allows.
    #[error("payload of {size} bytes exceeds the {max} byte limit")]
    Oversized {
        /// Payload size.
        size: usize,
        /// Limit.
        max: u32,
    },
    /// Entry payload is not UTF-8.
    #[error("entry payload is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Entry payload is not JSON.
    #[error("entry payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Entry JSON lacks the shape every ledger entry has.
    #[error("invalid entry: {0}")]
    Entry(String),
}
