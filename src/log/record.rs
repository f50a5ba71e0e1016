//! Record codec
//!
//! Encodes and decodes a single (key, value) record in the log's
//! self-describing, length-prefixed layout.

use std::io::{self, Read};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{KvlogError, Result};

/// Size of every length field (u32, little-endian)
pub const LEN_FIELD_SIZE: usize = 4;

/// Framing bytes inside a record body: key_len + value_len
pub const BODY_OVERHEAD: usize = 2 * LEN_FIELD_SIZE;

/// Upper bound on the buffer reserved before a value is read (64 KiB)
const MAX_VALUE_PREALLOC: u64 = 64 * 1024;

/// A single (key, value) pair as stored in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Encode this record, including its record_len prefix
    pub fn encode(&self) -> Result<Bytes> {
        encode(&self.key, &self.value)
    }

    /// Decode a record from the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self> {
        decode(buf)
    }

    /// Total bytes this record occupies on disk
    pub fn encoded_len(&self) -> Result<u64> {
        encoded_len(self.key.len(), self.value.len())
    }
}

// =============================================================================
// Sizing
// =============================================================================

/// Value of the record_len field for a pair of the given sizes
///
/// Fails with `RecordTooLarge` when the body does not fit in a u32.
pub fn record_len(key_len: usize, value_len: usize) -> Result<u32> {
    BODY_OVERHEAD
        .checked_add(key_len)
        .and_then(|n| n.checked_add(value_len))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(KvlogError::RecordTooLarge { key_len, value_len })
}

/// Bytes written to the log for a pair of the given sizes: 4 + record_len
pub fn encoded_len(key_len: usize, value_len: usize) -> Result<u64> {
    Ok(LEN_FIELD_SIZE as u64 + u64::from(record_len(key_len, value_len)?))
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a (key, value) pair
///
/// Layout: record_len (4) + key_len (4) + key + value_len (4) + value
pub fn encode(key: &[u8], value: &[u8]) -> Result<Bytes> {
    let record_len = record_len(key.len(), value.len())?;

    let mut buf = BytesMut::with_capacity(LEN_FIELD_SIZE + record_len as usize);
    buf.put_u32_le(record_len);
    buf.put_u32_le(key.len() as u32);
    buf.put_slice(key);
    buf.put_u32_le(value.len() as u32);
    buf.put_slice(value);

    Ok(buf.freeze())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a full record (record_len prefix included) from the start of `buf`
///
/// Bytes after the declared record are ignored. Offsets in errors are
/// relative to the start of `buf`.
pub fn decode(mut buf: &[u8]) -> Result<Record> {
    if buf.remaining() < LEN_FIELD_SIZE {
        return Err(KvlogError::corrupt(0, "record_len extends past end of buffer"));
    }
    let record_len = buf.get_u32_le() as usize;

    if buf.remaining() < record_len {
        return Err(KvlogError::corrupt(
            0,
            format!(
                "record_len {} exceeds remaining {} bytes",
                record_len,
                buf.remaining()
            ),
        ));
    }

    decode_body(&buf[..record_len]).map_err(|reason| KvlogError::corrupt(0, reason))
}

/// Decode a record body (everything after record_len)
///
/// The body must be consumed exactly by its key and value.
pub(crate) fn decode_body(mut body: &[u8]) -> std::result::Result<Record, String> {
    let key_len = take_len(&mut body, "key_len")?;
    let key = take_bytes(&mut body, key_len, "key")?;
    let value_len = take_len(&mut body, "value_len")?;
    let value = take_bytes(&mut body, value_len, "value")?;

    if body.has_remaining() {
        return Err(format!("{} unexpected bytes after value", body.remaining()));
    }

    Ok(Record { key, value })
}

fn take_len(buf: &mut &[u8], field: &str) -> std::result::Result<usize, String> {
    if buf.remaining() < LEN_FIELD_SIZE {
        return Err(format!("{} extends past end of record", field));
    }
    Ok(buf.get_u32_le() as usize)
}

fn take_bytes(buf: &mut &[u8], len: usize, field: &str) -> std::result::Result<Vec<u8>, String> {
    if buf.remaining() < len {
        return Err(format!(
            "{} length {} exceeds remaining {} bytes",
            field,
            len,
            buf.remaining()
        ));
    }
    let bytes = buf[..len].to_vec();
    buf.advance(len);
    Ok(bytes)
}

// =============================================================================
// Streaming Value Read
// =============================================================================

/// Read only the value of the record starting at the reader's position
///
/// The key is skipped without being materialized. `offset` is the record's
/// position in the log and is only used for error reporting.
pub fn read_value<R: Read>(reader: &mut R, offset: u64) -> Result<Vec<u8>> {
    let record_len = u64::from(read_len(reader, offset, "record_len")?);
    let key_len = u64::from(read_len(reader, offset, "key_len")?);

    if key_len + BODY_OVERHEAD as u64 > record_len {
        return Err(KvlogError::corrupt(
            offset,
            format!("key_len {} does not fit in record_len {}", key_len, record_len),
        ));
    }

    let skipped = io::copy(&mut reader.by_ref().take(key_len), &mut io::sink())?;
    if skipped < key_len {
        return Err(KvlogError::corrupt(offset, "key truncated"));
    }

    let value_len = u64::from(read_len(reader, offset, "value_len")?);
    if BODY_OVERHEAD as u64 + key_len + value_len != record_len {
        return Err(KvlogError::corrupt(
            offset,
            format!(
                "key_len {} and value_len {} disagree with record_len {}",
                key_len, value_len, record_len
            ),
        ));
    }

    // Grow with the bytes actually read; a damaged length must not size
    // the allocation up front
    let mut value = Vec::with_capacity(value_len.min(MAX_VALUE_PREALLOC) as usize);
    reader.by_ref().take(value_len).read_to_end(&mut value)?;
    if (value.len() as u64) < value_len {
        return Err(KvlogError::corrupt(offset, "value truncated"));
    }
    Ok(value)
}

fn read_len<R: Read>(reader: &mut R, offset: u64, field: &str) -> Result<u32> {
    let mut buf = [0u8; LEN_FIELD_SIZE];
    read_exact_or_corrupt(reader, &mut buf, offset, field)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_exact_or_corrupt<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    offset: u64,
    field: &str,
) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => KvlogError::corrupt(offset, format!("{} truncated", field)),
        _ => KvlogError::Io(e),
    })
}
