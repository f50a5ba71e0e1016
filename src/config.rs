//! Configuration for kvlog
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvlogError, Result};

/// Default size of the recovery scan buffer (8 KiB)
pub const DEFAULT_SCAN_BUFFER_SIZE: usize = 8192;

/// Main configuration for a kvlog store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the store's single log file
    /// Internal structure:
    ///   {data_dir}/
    ///     └── current-data     (append-only record log)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Write Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync the log after appends
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Recovery Configuration
    // -------------------------------------------------------------------------
    /// What to do with a truncated record at the end of the log
    pub recovery_mode: RecoveryMode,

    /// Lookahead buffer used while replaying the log (in bytes)
    pub scan_buffer_size: usize,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStrategy {
    /// Never fsync implicitly; durability is left to the OS or to `sync()`
    #[default]
    Never,

    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced appends
    EveryNEntries { count: usize },
}

/// Policy for a log whose final record was cut short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// A truncated tail fails `open` with `Corrupt`
    #[default]
    Strict,

    /// A truncated tail is dropped and the file is cut back to the last
    /// complete record
    Lenient,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./kvlog_data"),
            sync_strategy: SyncStrategy::Never,
            recovery_mode: RecoveryMode::Strict,
            scan_buffer_size: DEFAULT_SCAN_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.scan_buffer_size == 0 {
            return Err(KvlogError::Config(
                "scan_buffer_size must be greater than zero".to_string(),
            ));
        }
        if let SyncStrategy::EveryNEntries { count: 0 } = self.sync_strategy {
            return Err(KvlogError::Config(
                "EveryNEntries count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the recovery mode
    pub fn recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.config.recovery_mode = mode;
        self
    }

    /// Set the recovery scan buffer size (in bytes)
    pub fn scan_buffer_size(mut self, size: usize) -> Self {
        self.config.scan_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
