//! Hash Index Module
//!
//! In-memory map from key to the offset of its latest record.
//!
//! ## Responsibilities
//! - Point every key at the most recently written record for it
//! - Many concurrent readers, one writer at a time
//! - Never persisted: rebuilt from the log on every open
//!
//! ## Data Structure Choice
//! `HashMap` wrapped in a `parking_lot::RwLock`:
//! - Point lookups only, no ordering needed
//! - Readers hold the lock just long enough to copy out an offset

mod table;

pub use table::HashIndex;

/// A key and the log offset of its latest record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: Vec<u8>,
    pub offset: u64,
}
