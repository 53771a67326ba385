//! Radiation monitor binary log (.bin) parser
//!
//! The instrument writes a flat sequence of fixed-size records with no file
//! header. Upstream transfer artifacts can leave a few stray bytes in front of
//! the first record, so the parser first scans for an aligned start offset.
//!
//! Standard record layout (44 bytes, little-endian):
//! - 0..4   secs_of_month (u32)
//! - 4..8   value (f32)
//! - 8..16  dimension (8 bytes, NUL padded, Latin-1)
//! - 16..20 alarm (u32)
//! - 20..24 status (u32)
//! - 24..28 interval (u32)
//! - 28..35 date (7 bytes, Latin-1)
//! - 35..42 time (7 bytes, Latin-1)
//! - 42..44 padding, two spaces
//!
//! The extended layout inserts `len - 44` reserved bytes after the value field.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::types::{
    MeasurementRecord, ParseError, Parseable, RecordLayout, PADDING_BYTE, PADDING_SIZE,
    RECORD_SIZE,
};
use crate::dataset::Dataset;

/// How the alignment scan decides it has found the first record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Stop at the first offset where either the padding signature matches or
    /// the remaining length is a whole number of records. A buffer can be
    /// accepted on length alone without ever checking padding.
    #[default]
    FirstMatch,
    /// Stop only where the remaining length is a whole number of records and
    /// the first record carries the padding signature.
    Strict,
}

/// Sequential little-endian field reader over one record slice.
/// Callers check the slice length before reading.
struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        bytes
    }

    fn skip(&mut self, len: usize) {
        self.pos += len;
    }

    fn read_u32(&mut self) -> u32 {
        let b = self.take(4);
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    fn read_f32(&mut self) -> f32 {
        let b = self.take(4);
        f32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Fixed-width Latin-1 text, kept verbatim
    fn read_latin1(&mut self, len: usize) -> String {
        self.take(len).iter().map(|&b| char::from(b)).collect()
    }

    /// Fixed-width Latin-1 text with every NUL removed, wherever it sits
    fn read_latin1_stripped(&mut self, len: usize) -> String {
        self.take(len)
            .iter()
            .filter(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect()
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// Radiation monitor log parser
#[derive(Clone, Copy, Debug, Default)]
pub struct RadMonitor {
    pub layout: RecordLayout,
    pub alignment: AlignmentMode,
}

impl RadMonitor {
    pub fn new(layout: RecordLayout, alignment: AlignmentMode) -> Self {
        Self { layout, alignment }
    }

    /// Decode one record slice according to this parser's layout
    pub fn decode(&self, data: &[u8]) -> Result<MeasurementRecord, ParseError> {
        let record_len = self.layout.record_len();
        if data.len() < record_len {
            return Err(ParseError::TruncatedRecord {
                expected: record_len,
                actual: data.len(),
            });
        }
        Ok(decode_fields(data, self.layout.reserved_len()))
    }

    /// Align, decode and assemble a whole log
    pub fn parse_binary(&self, data: &[u8]) -> Result<Dataset, ParseError> {
        let Alignment { offset, matched } = locate_alignment(data, self.layout, self.alignment)?;
        let aligned = &data[offset..];
        let record_len = self.layout.record_len();

        tracing::debug!(
            offset,
            record_len,
            mode = ?self.alignment,
            matched = ?matched,
            "Aligned radiation log"
        );

        if matched == AlignmentMatch::Length && !aligned.is_empty() {
            tracing::warn!(
                "No padding signature at the first record; aligned on file length alone"
            );
        }

        let tail = aligned.len() % record_len;
        if tail > 0 {
            tracing::debug!(tail, "Discarding trailing partial record");
        }

        // Records are independent; the ordered collect keeps file order
        let records = aligned
            .par_chunks_exact(record_len)
            .map(|chunk| self.decode(chunk))
            .collect::<Result<Vec<_>, _>>()?;

        let dataset = Dataset::assemble(records);

        tracing::info!(
            "Parsed radiation log: {} records, {} bytes trimmed, {} unknown units",
            dataset.len(),
            offset,
            dataset.unknown_unit_count()
        );

        Ok(dataset)
    }
}

impl Parseable for RadMonitor {
    fn parse(&self, data: &[u8]) -> Result<Dataset, ParseError> {
        self.parse_binary(data)
    }
}

/// Padding signature check: the last two bytes of the first record are
/// spaces and the next record does not start with one
fn has_padding_signature(data: &[u8], record_len: usize) -> bool {
    data.len() > record_len
        && data[record_len - 2] == PADDING_BYTE
        && data[record_len - 1] == PADDING_BYTE
        && data[record_len] != PADDING_BYTE
}

/// Like `has_padding_signature`, but a final record with no successor passes
fn has_strict_padding(data: &[u8], record_len: usize) -> bool {
    data.len() >= record_len
        && data[record_len - 2] == PADDING_BYTE
        && data[record_len - 1] == PADDING_BYTE
        && data.get(record_len) != Some(&PADDING_BYTE)
}

/// Which check accepted the start offset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignmentMatch {
    /// Whole number of records, first record unpadded
    Length,
    /// Padding signature only; the buffer ends in a partial record
    Padding,
    /// Whole number of records with a padded first record
    LengthAndPadding,
}

/// Result of the alignment scan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alignment {
    /// Leading bytes to drop
    pub offset: usize,
    pub matched: AlignmentMatch,
}

/// Find how many leading bytes to drop so the buffer starts on a record
pub fn find_alignment(
    data: &[u8],
    layout: RecordLayout,
    mode: AlignmentMode,
) -> Result<usize, ParseError> {
    locate_alignment(data, layout, mode).map(|a| a.offset)
}

/// Find the start offset and report which check accepted it.
///
/// The scan drops one byte at a time and never runs past the point where the
/// padding check would index outside the buffer, so it always terminates.
pub fn locate_alignment(
    data: &[u8],
    layout: RecordLayout,
    mode: AlignmentMode,
) -> Result<Alignment, ParseError> {
    let record_len = layout.record_len();
    if record_len < RECORD_SIZE {
        return Err(ParseError::InvalidLength { len: record_len });
    }
    let mut offset = 0;

    loop {
        let remaining = &data[offset..];

        match mode {
            AlignmentMode::FirstMatch => {
                if remaining.len() % record_len == 0 {
                    let matched = if has_strict_padding(remaining, record_len) {
                        AlignmentMatch::LengthAndPadding
                    } else {
                        AlignmentMatch::Length
                    };
                    return Ok(Alignment { offset, matched });
                }
                if remaining.len() <= record_len {
                    return Err(ParseError::MalformedInput {
                        len: data.len(),
                        reason: format!(
                            "no record boundary found; {} bytes left after trimming {}",
                            remaining.len(),
                            offset
                        ),
                    });
                }
                if has_padding_signature(remaining, record_len) {
                    return Ok(Alignment {
                        offset,
                        matched: AlignmentMatch::Padding,
                    });
                }
            }
            AlignmentMode::Strict => {
                if remaining.len() < record_len {
                    return Err(ParseError::MalformedInput {
                        len: data.len(),
                        reason: format!(
                            "no padded record boundary found after trimming {} bytes",
                            offset
                        ),
                    });
                }
                if remaining.len() % record_len == 0 && has_strict_padding(remaining, record_len)
                {
                    return Ok(Alignment {
                        offset,
                        matched: AlignmentMatch::LengthAndPadding,
                    });
                }
            }
        }

        offset += 1;
    }
}

/// Decode a standard 44-byte record. Bytes past 42 are never read.
pub fn decode_record(data: &[u8]) -> Result<MeasurementRecord, ParseError> {
    RadMonitor::default().decode(data)
}

/// Decode an extended record of total length `len`
pub fn decode_extended(data: &[u8], len: usize) -> Result<MeasurementRecord, ParseError> {
    let layout = RecordLayout::from_len(len)?;
    RadMonitor::new(layout, AlignmentMode::default()).decode(data)
}

fn decode_fields(data: &[u8], reserved: usize) -> MeasurementRecord {
    let mut reader = FieldReader::new(data);

    let secs_of_month = reader.read_u32();
    let value = reader.read_f32();
    reader.skip(reserved);
    let dimension = reader.read_latin1_stripped(8);
    let alarm = reader.read_u32();
    let status = reader.read_u32();
    let interval = reader.read_u32();
    let date = reader.read_latin1(7);
    let time = reader.read_latin1(7);

    debug_assert_eq!(reader.position() + PADDING_SIZE, RECORD_SIZE + reserved);

    MeasurementRecord {
        secs_of_month,
        value,
        dimension,
        alarm,
        status,
        interval,
        date,
        time,
    }
}
