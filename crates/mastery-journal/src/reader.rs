//! Sequential and tailing reads.

use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

use crate::entry::EntryJson;
use crate::errors::JournalError;
use crate::frame::{FileHeader, FrameHeader, FrameKind};

/// How a frame cut short by the end of the file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// As [`JournalError::Truncated`]. For audits of a closed journal.
    Strict,
    /// As end-of-file, retried on the next call. For live journals.
    Permissive,
}

/// Reads frames in file order.
///
/// The position moves only past complete frames, so a permissive reader that
/// hit a half-written tail picks the frame up on a later call once the writer
/// has finished it.
pub struct JournalReader {
    file: File,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens a journal at its first frame. Fails on a missing or foreign file.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        Self::open_at(path, mode, FileHeader::LEN as u64)
    }

    /// Opens a journal at `offset`, a frame boundary previously returned by
    /// [`position`](Self::position).
    pub fn open_at<P: AsRef<Path>>(
        path: P,
        mode: ReadMode,
        offset: u64,
    ) -> Result<Self, JournalError> {
        let mut file = File::open(path)?;
        Self::read_header(&mut file)?;
        let position = offset.max(FileHeader::LEN as u64);

        Ok(Self {
            file,
            mode,
            position,
        })
    }

    fn read_header(file: &mut File) -> Result<FileHeader, JournalError> {
        file.seek(io::SeekFrom::Start(0))?;
        let mut bytes = [0u8; FileHeader::LEN];
        match file.read_exact(&mut bytes) {
            Ok(()) => FileHeader::decode(&bytes),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(JournalError::ShortFile {
                len: file.metadata()?.len(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Offset of the next unread frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame and checks its payload digest.
    ///
    /// Returns `Ok(None)` at end-of-file (or truncation in permissive mode).
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let file_size = self.file.metadata()?.len();
        if self.position >= file_size {
            return Ok(None);
        }

        let start = self.position;
        self.file.seek(io::SeekFrom::Start(start))?;

        let mut header_bytes = [0u8; FrameHeader::LEN];
        if !self.read_exact_or_truncated(&mut header_bytes, start)? {
            return Ok(None);
        }
        let header = FrameHeader::decode_at(&header_bytes, start)?;

        let mut payload = vec![0u8; header.len as usize];
        if !self.read_exact_or_truncated(&mut payload, start)? {
            return Ok(None);
        }
        header.check(&payload, start)?;

        self.position = start + header.frame_len();
        Ok(Some((header.kind, payload)))
    }

    /// Fills `buf`, returning `Ok(false)` on a permissive truncation.
    fn read_exact_or_truncated(&mut self, buf: &mut [u8], frame_start: u64) -> Result<bool, JournalError> {
        match self.file.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                if self.mode == ReadMode::Permissive {
                    Ok(false)
                } else {
                    Err(JournalError::Truncated {
                        offset: frame_start,
                    })
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the next entry JSON from the journal.
    ///
    /// Skips unknown frame kinds and returns `Ok(None)` at end-of-file.
    pub fn read_entry(&mut self) -> Result<Option<EntryJson>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::EntryJson, payload)) => {
                    let text = std::str::from_utf8(&payload)?;
                    return Ok(Some(serde_json::from_str(text)?));
                }
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }
}
