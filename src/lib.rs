//! radlog - A decoder for radiation monitor binary logs written in Rust
//!
//! This library turns the raw bytes of an instrument log into a columnar
//! dataset with every dose rate expressed in a single unit.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Alignment recovery and record decoding
//! - [`dataset`] - Columnar dataset assembly
//! - [`units`] - Dose-rate units and conversion to µSv/h
//! - [`export`] - Text table and JSON output
//! - [`settings`] - Decoder settings persistence

pub mod dataset;
pub mod export;
pub mod parsers;
pub mod settings;
pub mod units;

pub use dataset::Dataset;
pub use parsers::{MeasurementRecord, ParseError, Parseable, RadMonitor};
