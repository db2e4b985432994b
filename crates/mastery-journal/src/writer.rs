//! Appending to a journal.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::entry::{is_valid_entry_structure, EntryJson};
use crate::errors::JournalError;
use crate::frame::{FileHeader, FrameHeader, FrameKind};

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Appends ledger entries to a journal file.
///
/// Every frame goes out in one `write_all` on a file opened in append mode, so
/// several writers on one file interleave whole frames. A reader only sees a
/// partial frame if a writer died mid-write.
#[derive(Debug)]
pub struct JournalWriter {
    file: File,
    sync: bool,
    header: FileHeader,
}

impl JournalWriter {
    /// Opens a journal for appending, writing a fresh header into an empty file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, is non-empty but shorter than a
    /// header, or starts with something other than a journal header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .append(true)
            .open(path)?;

        let len = file.metadata()?.len();
        let header = if len == 0 {
            let header = FileHeader::new(unix_now());
            file.write_all(&header.encode())?;
            header
        } else if len < FileHeader::LEN as u64 {
            return Err(JournalError::ShortFile { len });
        } else {
            let mut bytes = [0u8; FileHeader::LEN];
            file.seek(io::SeekFrom::Start(0))?;
            file.read_exact(&mut bytes)?;
            FileHeader::decode(&bytes)?
        };

        let mut writer = Self {
            file,
            sync: options.sync,
            header,
        };
        writer.flush()?;
        Ok(writer)
    }

    /// Header of the open journal.
    pub fn header(&self) -> FileHeader {
        self.header
    }

    /// Cuts the file back to `len` bytes, dropping a torn tail frame.
    ///
    /// `len` must be a frame boundary, such as a reader's position after it
    /// stopped at a partial frame. The header is never cut.
    pub fn truncate(&mut self, len: u64) -> Result<(), JournalError> {
        self.file.set_len(len.max(FileHeader::LEN as u64))?;
        self.flush()
    }

    /// Length of the file on disk.
    pub fn file_len(&self) -> Result<u64, JournalError> {
        Ok(self.file.metadata()?.len())
    }

    /// Appends one ledger entry.
    ///
    /// # Errors
    ///
    /// Fails if the entry is not an object with an `entry_type`, or on I/O.
    pub fn append_entry(&mut self, entry: &EntryJson) -> Result<(), JournalError> {
        if !is_valid_entry_structure(entry) {
            return Err(JournalError::Entry(
                "entry must be a JSON object with an entry_type".to_string(),
            ));
        }
        let payload = serde_json::to_vec(entry)?;
        self.append_raw(FrameKind::EntryJson, &payload)
    }

    /// Appends a frame of any kind.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let header = FrameHeader::describe(kind, payload)?;
        let mut frame = Vec::with_capacity(FrameHeader::LEN + payload.len());
        frame.extend_from_slice(&header.encode());
        frame.extend_from_slice(payload);
        self.file.write_all(&frame)?;
        self.flush()
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
