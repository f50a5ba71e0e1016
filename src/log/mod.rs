//! Record Log Module
//!
//! The single append-only file that holds every record of a store.
//!
//! ## Responsibilities
//! - Encode and decode records
//! - Append records and track the running write offset
//! - Read a record's value back by offset
//! - Replay the log at open time to rebuild the index
//!
//! ## File Format
//! No file header or footer; the log is a plain sequence of records.
//! All integers are little-endian u32.
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ Record 1                                                      │
//! │ ┌────────────────┬────────────┬─────┬──────────────┬───────┐ │
//! │ │ RecordLen (4)  │ KeyLen (4) │ Key │ ValueLen (4) │ Value │ │
//! │ └────────────────┴────────────┴─────┴──────────────┴───────┘ │
//! ├───────────────────────────────────────────────────────────────┤
//! │ Record 2 ...                                                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//! `RecordLen = 4 + KeyLen + 4 + ValueLen`; a record occupies
//! `4 + RecordLen` bytes and its offset is the position of `RecordLen`.

mod record;
mod writer;
mod reader;
mod recovery;

pub use record::{
    decode, encode, encoded_len, read_value, record_len, Record, BODY_OVERHEAD, LEN_FIELD_SIZE,
};
pub use writer::LogWriter;
pub use reader::LogReader;
pub use recovery::{LogRecovery, RecoveryResult};
