//! On-disk layout of a `.mvj` journal.
//!
//! ```text
//! file    := header frame*
//! header  := "MVJ1" | version u16 | flags u16 | created_at i64        16 bytes
//! frame   := kind u8 | pad [3] | len u32 | digest [4] | payload       12 + len bytes
//! ```
//!
//! Integers are little endian. `created_at` is Unix seconds. `digest` is the
//! first four bytes of SHA-256 over the payload; it flags damage inside a
//! complete frame, while a frame cut short is reported as truncation.

use sha2::{Digest, Sha256};

use crate::errors::JournalError;

/// Journal file magic bytes.
pub const MAGIC: &[u8; 4] = b"MVJ1";

/// Current journal format version.
pub const VERSION: u16 = 1;

/// Largest accepted payload. Ledger entries are small JSON objects.
pub const MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

/// Frame kind byte for a ledger entry.
pub const FRAME_KIND_ENTRY_JSON: u8 = 0x01;

/// Truncated SHA-256 of a payload.
pub fn payload_digest(payload: &[u8]) -> [u8; 4] {
    let hash = Sha256::digest(payload);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// File header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Format version.
    pub version: u16,
    /// Creation time, Unix seconds.
    pub created_at: i64,
}

impl FileHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 16;

    /// A current-version header stamped with `created_at`.
    pub fn new(created_at: i64) -> Self {
        Self {
            version: VERSION,
            created_at,
        }
    }

    /// Encodes the header.
    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..4].copy_from_slice(MAGIC);
        out[4..6].copy_from_slice(&self.version.to_le_bytes());
        // bytes 6..8 hold flags, none defined
        out[8..].copy_from_slice(&self.created_at.to_le_bytes());
        out
    }

    /// Decodes and checks a header.
    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        let Some(bytes) = bytes.get(..Self::LEN) else {
            return Err(JournalError::Header(format!("{} bytes, need {}", bytes.len(), Self::LEN)));
        };
        if &bytes[..4] != MAGIC {
            return Err(JournalError::Header("bad magic".to_string()));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::Header(format!("unsupported version {version}")));
        }
        if bytes[6..8] != [0, 0] {
            return Err(JournalError::Header("unknown flags set".to_string()));
        }
        let mut created = [0u8; 8];
        created.copy_from_slice(&bytes[8..]);
        Ok(Self {
            version,
            created_at: i64::from_le_bytes(created),
        })
    }
}

/// What a frame carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 JSON object holding one ledger entry.
    EntryJson,
    /// A kind this version does not know. Readers skip it.
    Unknown(u8),
}

impl From<u8> for FrameKind {
    fn from(byte: u8) -> Self {
        match byte {
            FRAME_KIND_ENTRY_JSON => FrameKind::EntryJson,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::EntryJson => FRAME_KIND_ENTRY_JSON,
            FrameKind::Unknown(byte) => byte,
        }
    }
}

/// The fixed part of a frame, preceding its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length.
    pub len: u32,
    /// Truncated payload digest.
    pub digest: [u8; 4],
}

impl FrameHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 12;

    /// Describes `payload`, rejecting oversized ones.
    pub fn describe(kind: FrameKind, payload: &[u8]) -> Result<Self, JournalError> {
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|len| *len <= MAX_PAYLOAD_SIZE)
            .ok_or(JournalError::Oversized {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            })?;
        Ok(Self {
            kind,
            len,
            digest: payload_digest(payload),
        })
    }

    /// Total frame size including the payload.
    pub fn frame_len(&self) -> u64 {
        Self::LEN as u64 + u64::from(self.len)
    }

    /// Encodes the header.
    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[0] = self.kind.into();
        out[4..8].copy_from_slice(&self.len.to_le_bytes());
        out[8..].copy_from_slice(&self.digest);
        out
    }

    /// Decodes a header read at `offset`.
    pub fn decode_at(bytes: &[u8; Self::LEN], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0, 0, 0] {
            return Err(JournalError::Frame {
                offset,
                reason: "padding is not zero".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::Frame {
                offset,
                reason: format!("payload length {len} over limit {MAX_PAYLOAD_SIZE}"),
            });
        }
        Ok(Self {
            kind: FrameKind::from(bytes[0]),
            len,
            digest: [bytes[8], bytes[9], bytes[10], bytes[11]],
        })
    }

    /// Checks `payload` against the recorded digest.
    pub fn check(&self, payload: &[u8], offset: u64) -> Result<(), JournalError> {
        if payload_digest(payload) == self.digest {
            Ok(())
        } else {
            Err(JournalError::Checksum { offset })
        }
    }
}
