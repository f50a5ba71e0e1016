//! Tests for the record codec
//!
//! These tests verify:
//! - Exact on-disk layout of an encoded record
//! - decode(encode(k, v)) == (k, v), including empty and binary data
//! - Corrupt detection for lengths that run past the buffer
//! - The streaming value read used by lookups

use std::io::{Cursor, Read};

use kvlog::log::{self, Record, BODY_OVERHEAD, LEN_FIELD_SIZE};
use kvlog::KvlogError;

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_encode_layout() {
    let bytes = log::encode(b"key", b"value").unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&16u32.to_le_bytes()); // 4 + 3 + 4 + 5
    expected.extend_from_slice(&3u32.to_le_bytes());
    expected.extend_from_slice(b"key");
    expected.extend_from_slice(&5u32.to_le_bytes());
    expected.extend_from_slice(b"value");

    assert_eq!(&bytes[..], &expected[..]);
}

#[test]
fn test_encoded_len_matches_encode() {
    let bytes = log::encode(b"hello", b"world!").unwrap();

    assert_eq!(bytes.len() as u64, log::encoded_len(5, 6).unwrap());
    assert_eq!(log::record_len(5, 6).unwrap() as usize, bytes.len() - LEN_FIELD_SIZE);
}

#[test]
fn test_empty_record_is_header_only() {
    let bytes = log::encode(b"", b"").unwrap();

    assert_eq!(bytes.len(), LEN_FIELD_SIZE + BODY_OVERHEAD);
    assert_eq!(log::record_len(0, 0).unwrap(), BODY_OVERHEAD as u32);
}

#[test]
fn test_record_len_overflow_rejected() {
    let result = log::record_len(u32::MAX as usize, 1);

    assert!(matches!(
        result,
        Err(KvlogError::RecordTooLarge { value_len: 1, .. })
    ));
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_roundtrip_simple() {
    let record = Record::new(b"key".to_vec(), b"value".to_vec());

    let decoded = Record::decode(&record.encode().unwrap()).unwrap();

    assert_eq!(decoded, record);
}

#[test]
fn test_roundtrip_empty_key_and_value() {
    let cases: [(&[u8], &[u8]); 3] = [(b"", b"v"), (b"k", b""), (b"", b"")];

    for (key, value) in cases {
        let decoded = log::decode(&log::encode(key, value).unwrap()).unwrap();
        assert_eq!(decoded.key, key);
        assert_eq!(decoded.value, value);
    }
}

#[test]
fn test_roundtrip_binary_with_zero_bytes() {
    let key = vec![0u8, 1, 0, 255, 0];
    let value = vec![0u8; 64];

    let decoded = log::decode(&log::encode(&key, &value).unwrap()).unwrap();

    assert_eq!(decoded.key, key);
    assert_eq!(decoded.value, value);
}

#[test]
fn test_decode_ignores_following_records() {
    let mut buf = log::encode(b"first", b"1").unwrap().to_vec();
    buf.extend_from_slice(&log::encode(b"second", b"2").unwrap());

    let decoded = log::decode(&buf).unwrap();

    assert_eq!(decoded, Record::new(b"first".to_vec(), b"1".to_vec()));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_decode_empty_buffer() {
    let result = log::decode(&[]);
    assert!(matches!(result, Err(KvlogError::Corrupt { .. })));
}

#[test]
fn test_decode_truncated_record() {
    let bytes = log::encode(b"key", b"value").unwrap();

    for cut in 1..bytes.len() {
        let result = log::decode(&bytes[..cut]);
        assert!(result.unwrap_err().is_corrupt(), "cut at {} should be corrupt", cut);
    }
}

#[test]
fn test_decode_key_len_past_record() {
    let mut bytes = log::encode(b"key", b"value").unwrap().to_vec();
    // key_len = 1000
    bytes[4..8].copy_from_slice(&1000u32.to_le_bytes());

    let err = log::decode(&bytes).unwrap_err();
    assert!(err.is_corrupt());
}

#[test]
fn test_decode_lengths_disagree_with_record_len() {
    let mut bytes = log::encode(b"key", b"value").unwrap().to_vec();
    // value_len = 2, leaving 3 unexplained bytes in the record
    bytes[11..15].copy_from_slice(&2u32.to_le_bytes());

    let err = log::decode(&bytes).unwrap_err();
    assert!(err.is_corrupt());
}

// =============================================================================
// read_value Tests
// =============================================================================

#[test]
fn test_read_value() {
    let bytes = log::encode(b"key", b"test-value").unwrap();
    let mut reader = Cursor::new(bytes.to_vec());

    let value = log::read_value(&mut reader, 0).unwrap();

    assert_eq!(value, b"test-value");
}

#[test]
fn test_read_value_leaves_reader_at_next_record() {
    let mut buf = log::encode(b"a", b"1").unwrap().to_vec();
    buf.extend_from_slice(&log::encode(b"b", b"22").unwrap());
    let mut reader = Cursor::new(buf);

    assert_eq!(log::read_value(&mut reader, 0).unwrap(), b"1");
    assert_eq!(log::read_value(&mut reader, 14).unwrap(), b"22");

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn test_read_value_empty_value() {
    let bytes = log::encode(b"key", b"").unwrap();

    let value = log::read_value(&mut Cursor::new(bytes.to_vec()), 0).unwrap();

    assert!(value.is_empty());
}

#[test]
fn test_read_value_truncated_is_corrupt() {
    let bytes = log::encode(b"key", b"value").unwrap();
    let truncated = bytes[..bytes.len() - 1].to_vec();

    let err = log::read_value(&mut Cursor::new(truncated), 42).unwrap_err();

    match err {
        KvlogError::Corrupt { offset, .. } => assert_eq!(offset, 42),
        other => panic!("expected Corrupt, got {:?}", other),
    }
}

#[test]
fn test_read_value_truncated_in_key_is_corrupt() {
    let bytes = log::encode(b"a-long-key", b"v").unwrap();
    let truncated = bytes[..10].to_vec();

    let err = log::read_value(&mut Cursor::new(truncated), 0).unwrap_err();

    assert!(err.is_corrupt());
}

#[test]
fn test_read_value_huge_declared_length_is_corrupt() {
    // Consistent lengths claiming a ~4 GiB value, followed by a few bytes
    let value_len = u32::MAX - BODY_OVERHEAD as u32 - 1;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(b"k");
    bytes.extend_from_slice(&value_len.to_le_bytes());
    bytes.extend_from_slice(b"short");

    let err = log::read_value(&mut Cursor::new(bytes), 7).unwrap_err();

    assert!(matches!(err, KvlogError::Corrupt { offset: 7, .. }));
}
