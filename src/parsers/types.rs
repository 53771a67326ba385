use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::Dataset;

/// Size of a standard measurement record in bytes
pub const RECORD_SIZE: usize = 44;

/// Bytes at the end of every record that carry no field data
pub const PADDING_SIZE: usize = 2;

/// Byte value expected in both padding positions of a well-aligned record
pub const PADDING_BYTE: u8 = b' ';

/// Errors raised while turning a raw log into records
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// No aligned start offset could be found in the buffer
    #[error("Malformed input ({len} bytes): {reason}")]
    MalformedInput { len: usize, reason: String },

    /// Extended record length shorter than a standard record
    #[error("Invalid record length {len}: must be at least {min} bytes", min = RECORD_SIZE)]
    InvalidLength { len: usize },

    /// Slice handed to the decoder is shorter than the layout needs
    #[error("Truncated record: expected {expected} bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },
}

/// One decoded instrument sample
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeasurementRecord {
    /// Offset in seconds from the start of the calendar month
    pub secs_of_month: u32,
    /// Raw sensor reading in the unit named by `dimension`
    pub value: f32,
    /// Unit label with every NUL byte removed
    pub dimension: String,
    pub alarm: u32,
    pub status: u32,
    /// Sampling interval
    pub interval: u32,
    /// Instrument-formatted date, kept verbatim
    pub date: String,
    /// Instrument-formatted time, kept verbatim
    pub time: String,
}

/// Record layouts understood by the decoder
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordLayout {
    /// 44-byte records
    #[default]
    Standard,
    /// Longer records with `len - 44` reserved bytes after the value field
    Extended { len: usize },
}

impl RecordLayout {
    /// Build a layout from a total record length
    pub fn from_len(len: usize) -> Result<Self, ParseError> {
        match len {
            RECORD_SIZE => Ok(RecordLayout::Standard),
            len if len > RECORD_SIZE => Ok(RecordLayout::Extended { len }),
            len => Err(ParseError::InvalidLength { len }),
        }
    }

    /// Total bytes per record
    pub fn record_len(&self) -> usize {
        match self {
            RecordLayout::Standard => RECORD_SIZE,
            RecordLayout::Extended { len } => *len,
        }
    }

    /// Reserved bytes skipped between the value and dimension fields
    pub fn reserved_len(&self) -> usize {
        self.record_len().saturating_sub(RECORD_SIZE)
    }
}

/// Trait for log file parsers
pub trait Parseable {
    fn parse(&self, data: &[u8]) -> Result<Dataset, ParseError>;
}
