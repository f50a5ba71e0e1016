//! Hash index implementation
//!
//! HashMap-based index with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::IndexEntry;

/// Key -> offset map owned by a single store instance
#[derive(Debug, Default)]
pub struct HashIndex {
    entries: RwLock<HashMap<Vec<u8>, u64>>,
}

impl HashIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the latest record for `key` (read lock)
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.entries.read().get(key).copied()
    }

    /// Point `key` at `offset`, returning the offset it replaced (write lock)
    pub fn insert(&self, key: Vec<u8>, offset: u64) -> Option<u64> {
        self.entries.write().insert(key, offset)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of every entry, ordered by offset (i.e. write order of
    /// each key's latest record)
    pub fn entries(&self) -> Vec<IndexEntry> {
        let mut entries: Vec<IndexEntry> = self
            .entries
            .read()
            .iter()
            .map(|(key, &offset)| IndexEntry {
                key: key.clone(),
                offset,
            })
            .collect();
        entries.sort_by_key(|entry| entry.offset);
        entries
    }
}
