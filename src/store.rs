//! Store Module
//!
//! The log store that ties the record log and the hash index together.
//!
//! ## Responsibilities
//! - Open the log and rebuild the index before serving any call
//! - Append records and keep the index pointing at the latest ones
//! - Serve lookups straight from the log by offset
//! - Release the file handle on close

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::error::{KvlogError, Result};
use crate::index::HashIndex;
use crate::log::{self, LogReader, LogRecovery, LogWriter, RecoveryResult};

/// An open log-structured store over a single directory
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (put): Serialized by the `writer` mutex
///   - Append + index update form one critical section
///   - A failed append never touches the index
///
/// - **Reads** (get): Never take the writer mutex
///   - Index read lock is held only to copy out an offset
///   - Each read opens its own file handle; bytes behind the write
///     offset are never rewritten, so no further locking is needed
///   - A get racing a put to the same key may see either value
pub struct LogStore {
    /// Store configuration
    config: Config,

    /// Path of the log file inside `config.data_dir`
    log_path: PathBuf,

    /// Append handle and running offset (exclusive access needed)
    writer: Mutex<LogWriter>,

    /// Opens independent read handles for lookups
    reader: LogReader,

    /// Key -> latest record offset (internal RwLock)
    index: HashIndex,

    /// Records in the log, superseded ones included
    records: AtomicU64,

    /// What recovery found when this store was opened
    recovery: RecoveryResult,
}

/// Point-in-time counters for a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Distinct live keys
    pub keys: usize,
    /// Records in the log, superseded ones included
    pub records: u64,
    /// Log size in bytes
    pub log_size: u64,
}

impl LogStore {
    /// Name of the log file inside the data directory
    pub const LOG_FILENAME: &'static str = "current-data";

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if it doesn't exist
    /// 2. Open/create the log in append mode
    /// 3. Replay the log to rebuild the index
    /// 4. Ready to serve requests
    ///
    /// Any failure drops the handles acquired so far; no partial store is
    /// returned.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Create data directory
        fs::create_dir_all(&config.data_dir)?;
        let log_path = config.data_dir.join(Self::LOG_FILENAME);

        // Step 2: Open the append handle (creates the file)
        let mut writer = LogWriter::open(&log_path, config.sync_strategy)?;

        // Step 3: Replay
        let (index, recovery) =
            LogRecovery::recover(&log_path, config.recovery_mode, config.scan_buffer_size)?;

        if recovery.was_truncated {
            warn!(
                valid_len = recovery.valid_len,
                dropped_bytes = recovery.truncated_bytes,
                "dropping truncated tail record"
            );
            writer.truncate(recovery.valid_len)?;
        }

        info!(
            path = %log_path.display(),
            records = recovery.records_recovered,
            keys = recovery.keys_indexed,
            log_size = writer.offset(),
            "opened log store"
        );

        Ok(Self {
            reader: LogReader::new(&log_path),
            records: AtomicU64::new(recovery.records_recovered),
            config,
            log_path,
            writer: Mutex::new(writer),
            index,
            recovery,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().data_dir(path.as_ref()).build();
        Self::open(config)
    }

    /// Put a key-value pair
    ///
    /// Steps:
    /// 1. Encode the record (outside the lock)
    /// 2. Acquire the writer
    /// 3. Append with a single write
    /// 4. Point the index at the new record
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let record = log::encode(key, value)?;

        let mut writer = self.writer.lock();
        let offset = writer.append(&record)?;

        // Still under the writer lock so index order matches log order
        self.index.insert(key.to_vec(), offset);
        self.records.fetch_add(1, Ordering::Relaxed);

        trace!(offset, len = record.len(), "appended record");
        Ok(())
    }

    /// Get the latest value for a key
    ///
    /// Returns `NotFound` when the key was never written. A `Corrupt`
    /// result only concerns this record; the store stays usable.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let offset = self.index.get(key).ok_or(KvlogError::NotFound)?;

        self.reader.read_value_at(offset).map_err(|e| {
            if e.is_corrupt() {
                debug!(offset, error = %e, "failed to read record");
            }
            e
        })
    }

    /// Force the log to disk regardless of sync strategy
    pub fn sync(&self) -> Result<()> {
        self.writer.lock().sync()
    }

    /// Close the store gracefully
    ///
    /// Flushes and syncs the log, then releases the file handle.
    pub fn close(self) -> Result<()> {
        let writer = self.writer.into_inner();
        let log_size = writer.offset();
        writer.close()?;

        debug!(path = %self.log_path.display(), log_size, "closed log store");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All keys, in the order their latest records were written
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.index.entries().into_iter().map(|entry| entry.key).collect()
    }

    /// Current log size in bytes (== next write offset)
    pub fn log_size(&self) -> u64 {
        self.writer.lock().offset()
    }

    pub fn stats(&self) -> StoreStats {
        // Take the writer first so the counters describe the same log state
        let writer = self.writer.lock();
        StoreStats {
            keys: self.index.len(),
            records: self.records.load(Ordering::Relaxed),
            log_size: writer.offset(),
        }
    }

    /// What recovery found when this store was opened
    pub fn recovery(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the log file path
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
