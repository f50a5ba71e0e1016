//! Tests for the record log: codec, writer, reader and recovery

mod record_tests;
mod reader_tests;
