//! Error types for kvlog
//!
//! Provides a unified error type for all store operations.

use thiserror::Error;

/// Result type alias using KvlogError
pub type Result<T> = std::result::Result<T, KvlogError>;

/// Unified error type for kvlog operations
#[derive(Debug, Error)]
pub enum KvlogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    #[error("Log corruption detected at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    #[error("Record too large: key_len={key_len}, value_len={value_len}")]
    RecordTooLarge { key_len: usize, value_len: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvlogError {
    /// Shorthand for building a `Corrupt` error
    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        KvlogError::Corrupt {
            offset,
            reason: reason.into(),
        }
    }

    /// Whether this error reports a damaged or truncated log
    pub fn is_corrupt(&self) -> bool {
        matches!(self, KvlogError::Corrupt { .. })
    }

    /// Whether this error reports a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvlogError::NotFound)
    }
}
