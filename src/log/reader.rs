//! Log Reader
//!
//! Positioned reads of record values for lookups.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::record;

/// Reads values out of the log by offset
///
/// Each read opens its own handle, so reads never contend with the writer
/// or with each other.
#[derive(Debug, Clone)]
pub struct LogReader {
    path: PathBuf,
}

impl LogReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read the value of the record starting at `offset`
    pub fn read_value_at(&self, offset: u64) -> Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut reader = BufReader::new(file);
        record::read_value(&mut reader, offset)
    }
}
