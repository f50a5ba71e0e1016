//! Tests for LogReader

use std::fs::{self, OpenOptions};
use std::io::Write;

use kvlog::config::SyncStrategy;
use kvlog::log::{self, LogReader, LogWriter};
use kvlog::KvlogError;
use tempfile::TempDir;

#[test]
fn test_read_value_at_offsets() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.log");

    let mut writer = LogWriter::open(&log_path, SyncStrategy::Never).unwrap();
    let first = writer.append(&log::encode(b"key1", b"value1").unwrap()).unwrap();
    let second = writer.append(&log::encode(b"key2", b"value2").unwrap()).unwrap();

    let reader = LogReader::new(&log_path);
    assert_eq!(reader.read_value_at(first).unwrap(), b"value1");
    assert_eq!(reader.read_value_at(second).unwrap(), b"value2");
}

#[test]
fn test_reader_sees_later_appends() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.log");

    let mut writer = LogWriter::open(&log_path, SyncStrategy::Never).unwrap();
    let reader = LogReader::new(&log_path);

    for i in 0..20u32 {
        let value = i.to_le_bytes();
        let offset = writer.append(&log::encode(b"counter", &value).unwrap()).unwrap();
        assert_eq!(reader.read_value_at(offset).unwrap(), value);
    }
}

#[test]
fn test_read_past_end_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.log");

    let mut writer = LogWriter::open(&log_path, SyncStrategy::Never).unwrap();
    writer.append(&log::encode(b"k", b"v").unwrap()).unwrap();

    let reader = LogReader::new(&log_path);
    let err = reader.read_value_at(1000).unwrap_err();

    assert!(matches!(err, KvlogError::Corrupt { offset: 1000, .. }));
}

#[test]
fn test_read_damaged_record_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.log");

    {
        let mut file = OpenOptions::new().create(true).append(true).open(&log_path).unwrap();
        // record_len says 100 but only a few bytes follow
        file.write_all(&100u32.to_le_bytes()).unwrap();
        file.write_all(&1u32.to_le_bytes()).unwrap();
        file.write_all(b"k").unwrap();
    }
    assert_eq!(fs::metadata(&log_path).unwrap().len(), 9);

    let err = LogReader::new(&log_path).read_value_at(0).unwrap_err();
    assert!(err.is_corrupt());
}

#[test]
fn test_read_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let reader = LogReader::new(&temp_dir.path().join("absent.log"));

    assert!(matches!(reader.read_value_at(0), Err(KvlogError::Io(_))));
}
