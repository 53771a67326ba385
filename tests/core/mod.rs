//! Core module tests for non-parser functionality
//!
//! Tests for:
//! - Unit conversions
//! - Dataset assembly
//! - Table and JSON export
//! - Settings persistence
