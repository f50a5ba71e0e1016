//! # kvlog
//!
//! An embedded, log-structured key-value store with:
//! - A single append-only record log per directory
//! - An in-memory hash index from key to latest record offset
//! - Index rebuild by replaying the log on open
//! - Single-writer/multi-reader concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         LogStore                             │
//! │              open / put / get / close                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Record Log │          │  HashIndex  │
//!   │  (Append)   │◄─────────│  (RwLock)   │
//!   └──────┬──────┘  offset  └──────▲──────┘
//!          │                        │
//!          └──── LogRecovery ───────┘
//!                (replay on open)
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvlogError, Result};
pub use config::{Config, RecoveryMode, SyncStrategy};
pub use store::{LogStore, StoreStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
