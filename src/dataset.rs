//! Columnar dataset assembled from decoded records.

use serde::Serialize;

use crate::parsers::types::MeasurementRecord;
use crate::units::{self, CANONICAL_UNIT};

/// Parsed log in column form. Index `i` of every column describes the same
/// record; all values are in [`CANONICAL_UNIT`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub secs: Vec<u32>,
    pub value: Vec<f64>,
    /// Single unit label shared by the whole `value` column
    pub dimension: &'static str,
    pub alarm: Vec<u32>,
    pub status: Vec<u32>,
    pub interval: Vec<u32>,
    pub date: Vec<String>,
    pub time: Vec<String>,
}

/// Borrowed view of one dataset row
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DatasetRow<'a> {
    pub secs: u32,
    pub value: f64,
    pub dimension: &'a str,
    pub alarm: u32,
    pub status: u32,
    pub interval: u32,
    pub date: &'a str,
    pub time: &'a str,
}

impl Dataset {
    /// Fold records into columns, converting each value to the canonical unit.
    /// Record order is preserved.
    pub fn assemble<I>(records: I) -> Self
    where
        I: IntoIterator<Item = MeasurementRecord>,
    {
        let records = records.into_iter();
        let capacity = records.size_hint().0;

        let mut dataset = Dataset {
            secs: Vec::with_capacity(capacity),
            value: Vec::with_capacity(capacity),
            dimension: CANONICAL_UNIT,
            alarm: Vec::with_capacity(capacity),
            status: Vec::with_capacity(capacity),
            interval: Vec::with_capacity(capacity),
            date: Vec::with_capacity(capacity),
            time: Vec::with_capacity(capacity),
        };

        for (index, record) in records.enumerate() {
            let raw = f64::from(record.value);
            let value = if record.dimension == CANONICAL_UNIT {
                raw
            } else {
                units::try_to_canonical(raw, &record.dimension).unwrap_or_else(|e| {
                    tracing::warn!(label = %record.dimension, index, "{}", e);
                    f64::NAN
                })
            };

            dataset.secs.push(record.secs_of_month);
            dataset.value.push(value);
            dataset.alarm.push(record.alarm);
            dataset.status.push(record.status);
            dataset.interval.push(record.interval);
            dataset.date.push(record.date);
            dataset.time.push(record.time);
        }

        dataset
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.secs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secs.is_empty()
    }

    /// Get one row by index
    pub fn row(&self, index: usize) -> Option<DatasetRow<'_>> {
        Some(DatasetRow {
            secs: *self.secs.get(index)?,
            value: *self.value.get(index)?,
            dimension: self.dimension,
            alarm: *self.alarm.get(index)?,
            status: *self.status.get(index)?,
            interval: *self.interval.get(index)?,
            date: self.date.get(index)?,
            time: self.time.get(index)?,
        })
    }

    /// Iterate rows in record order
    pub fn rows(&self) -> impl Iterator<Item = DatasetRow<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Values poisoned by an unknown unit label
    pub fn unknown_unit_count(&self) -> usize {
        self.value.iter().filter(|v| v.is_nan()).count()
    }
}
