//! Log Recovery
//!
//! Rebuilds the hash index by replaying the log from offset 0.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::config::{RecoveryMode, DEFAULT_SCAN_BUFFER_SIZE};
use crate::error::{KvlogError, Result};
use crate::index::HashIndex;

use super::record::{self, LEN_FIELD_SIZE};

/// Replays a log file into a fresh index
pub struct LogRecovery;

/// Result of a recovery scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of complete records replayed
    pub records_recovered: u64,

    /// Number of distinct keys in the rebuilt index
    pub keys_indexed: usize,

    /// Offset just past the last complete record
    pub valid_len: u64,

    /// Whether the log ends in an incomplete record
    pub was_truncated: bool,

    /// Bytes after `valid_len` that do not form a complete record
    pub truncated_bytes: u64,
}

/// Outcome of reading a record_len field
enum LenPrefix {
    /// Clean end of log: zero bytes left
    End,
    /// Between one and three bytes left
    Partial,
    Len(u32),
}

impl LogRecovery {
    /// Recover the index from a log file
    ///
    /// This will:
    /// 1. Read every complete record in order
    /// 2. Point each key at the offset of its latest record
    /// 3. Handle a truncated tail according to `mode`: `Strict` fails with
    ///    `Corrupt`, `Lenient` reports it in the result for the caller to cut
    ///
    /// A record whose internal lengths disagree is `Corrupt` in either mode.
    pub fn recover(
        path: &Path,
        mode: RecoveryMode,
        buffer_size: usize,
    ) -> Result<(HashIndex, RecoveryResult)> {
        let (index, result) = Self::scan(path, buffer_size)?;

        if result.was_truncated && mode == RecoveryMode::Strict {
            return Err(KvlogError::corrupt(
                result.valid_len,
                format!(
                    "truncated tail: {} trailing bytes do not form a complete record",
                    result.truncated_bytes
                ),
            ));
        }

        Ok((index, result))
    }

    /// Verify integrity of a log file without modifying it
    ///
    /// A truncated tail is reported, not treated as an error.
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        Self::scan(path, DEFAULT_SCAN_BUFFER_SIZE).map(|(_, result)| result)
    }

    fn scan(path: &Path, buffer_size: usize) -> Result<(HashIndex, RecoveryResult)> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::with_capacity(buffer_size, file);

        let index = HashIndex::new();
        let mut result = RecoveryResult::default();
        let mut offset = 0u64;
        let mut body = Vec::with_capacity(buffer_size);

        loop {
            let record_len = match read_record_len(&mut reader)? {
                LenPrefix::End => break,
                LenPrefix::Partial => {
                    result.was_truncated = true;
                    break;
                }
                LenPrefix::Len(len) => len as usize,
            };

            // Check against the file length before allocating for a length
            // that may be garbage
            let end = offset + (LEN_FIELD_SIZE + record_len) as u64;
            if end > file_len {
                result.was_truncated = true;
                break;
            }

            body.resize(record_len, 0);
            match reader.read_exact(&mut body) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    result.was_truncated = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            let record =
                record::decode_body(&body).map_err(|reason| KvlogError::corrupt(offset, reason))?;
            index.insert(record.key, offset);
            result.records_recovered += 1;
            offset = end;

            // Oversized records get an exact-size buffer that is not kept
            if body.capacity() > buffer_size {
                body = Vec::with_capacity(buffer_size);
            }
        }

        result.valid_len = offset;
        if result.was_truncated {
            result.truncated_bytes = file_len.saturating_sub(offset);
        }
        result.keys_indexed = index.len();

        Ok((index, result))
    }
}

/// Read the next record_len field, distinguishing a clean end of log from a
/// prefix that was cut short
fn read_record_len<R: Read>(reader: &mut R) -> io::Result<LenPrefix> {
    let mut buf = [0u8; LEN_FIELD_SIZE];
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(match filled {
        0 => LenPrefix::End,
        n if n < LEN_FIELD_SIZE => LenPrefix::Partial,
        _ => LenPrefix::Len(u32::from_le_bytes(buf)),
    })
}
