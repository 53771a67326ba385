//! Dataset export (text table, JSON).

use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Header row of the text table
pub const TABLE_HEADER: &str = "secs, value, dimension, alarm, status, interval, date, time";

/// Output formats supported by the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Write the dataset as a comma-space separated table, one row per record
pub fn write_table<W: Write>(dataset: &Dataset, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", TABLE_HEADER)?;
    for row in dataset.rows() {
        writeln!(
            writer,
            "{}, {:?}, {}, {}, {}, {}, {}, {}",
            row.secs,
            row.value,
            row.dimension,
            row.alarm,
            row.status,
            row.interval,
            row.date,
            row.time
        )?;
    }
    Ok(())
}

/// Serialize the dataset as pretty-printed JSON.
/// NaN values are written as `null`.
pub fn to_json(dataset: &Dataset) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dataset)
}

/// Write the dataset in the requested format
pub fn write_dataset<W: Write>(
    dataset: &Dataset,
    format: OutputFormat,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Table => write_table(dataset, writer),
        OutputFormat::Json => {
            let json = to_json(dataset)?;
            writeln!(writer, "{}", json)
        }
    }
}
