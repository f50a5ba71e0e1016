//! Log Writer
//!
//! Owns the append handle of the log file and its running write offset.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::config::SyncStrategy;
use crate::error::{KvlogError, Result};

/// Appends encoded records to the log file
pub struct LogWriter {
    /// Append-mode handle; every write lands at end of file
    file: File,
    path: PathBuf,
    /// Byte length of the log, i.e. where the next record will start
    offset: u64,
    sync_strategy: SyncStrategy,
    /// Appends since the last fsync
    unsynced: usize,
    /// Set when a failed append could not be rolled back
    failed: bool,
}

impl LogWriter {
    /// Open or create the log file in append mode
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let offset = file.metadata()?.len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            offset,
            sync_strategy,
            unsynced: 0,
            failed: false,
        })
    }

    /// Append one encoded record with a single write
    ///
    /// Returns the offset the record starts at. If either the write or a
    /// strategy-driven fsync fails, the offset is left unchanged and the
    /// record's bytes are cut off again, so a failed append is never
    /// recovered on a later open.
    pub fn append(&mut self, record: &[u8]) -> Result<u64> {
        if self.failed {
            return Err(KvlogError::Io(io::Error::new(
                io::ErrorKind::Other,
                "log tail is in an unknown state after a failed rollback",
            )));
        }

        let offset = self.offset;
        self.unsynced += 1;
        if let Err(e) = self.write_and_sync(record) {
            self.unsynced -= 1;
            self.rollback(offset);
            return Err(e);
        }

        self.offset += record.len() as u64;
        Ok(offset)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Cut the log back to `len` bytes (used to drop a truncated tail)
    pub fn truncate(&mut self, len: u64) -> Result<()> {
        self.file.set_len(len)?;
        self.file.sync_all()?;
        self.offset = len;
        self.unsynced = 0;
        Ok(())
    }

    /// Flush, sync and release the file handle
    pub fn close(mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Current write offset (== file length)
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_and_sync(&mut self, record: &[u8]) -> Result<()> {
        self.file.write_all(record)?;
        self.maybe_sync()
    }

    fn maybe_sync(&mut self) -> Result<()> {
        match self.sync_strategy {
            SyncStrategy::Never => Ok(()),
            SyncStrategy::EveryWrite => self.sync(),
            SyncStrategy::EveryNEntries { count } if self.unsynced >= count => self.sync(),
            SyncStrategy::EveryNEntries { .. } => Ok(()),
        }
    }

    fn rollback(&mut self, offset: u64) {
        match self.file.set_len(offset) {
            Ok(()) => warn!(offset, path = %self.path.display(), "rolled back partial append"),
            Err(e) => {
                error!(offset, error = %e, "failed to roll back partial append; refusing further writes");
                self.failed = true;
            }
        }
    }
}
