//! Tests for the hash index
