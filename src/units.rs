//! Dose-rate units and conversion to the canonical unit.
//!
//! Every value in an assembled dataset is expressed in [`CANONICAL_UNIT`].
//! Records declaring any other known unit are scaled; unknown labels poison
//! the value with NaN instead of failing the whole file.

use std::str::FromStr;

use strum::{AsRefStr, EnumString};
use thiserror::Error;

/// Unit every dataset value is converted to
pub const CANONICAL_UNIT: &str = "µSv/h";

/// Errors from unit conversion
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unknown dose-rate unit: {0:?}")]
    UnknownUnit(String),
}

/// Dose-rate units written by the instrument
#[derive(AsRefStr, Clone, Copy, Debug, EnumString, PartialEq, Eq)]
pub enum DoseRateUnit {
    #[strum(serialize = "Sv/h")]
    SievertPerHour,
    #[strum(serialize = "mSv/h")]
    MillisievertPerHour,
    #[strum(serialize = "µSv/h")]
    MicrosievertPerHour,
}

impl DoseRateUnit {
    /// Factor that converts a value in this unit to µSv/h
    pub fn multiplier(&self) -> f64 {
        match self {
            DoseRateUnit::SievertPerHour => 1e6,
            DoseRateUnit::MillisievertPerHour => 1e3,
            DoseRateUnit::MicrosievertPerHour => 1.0,
        }
    }
}

/// Convert a value to µSv/h, reporting labels that are not dose rates
pub fn try_to_canonical(value: f64, label: &str) -> Result<f64, UnitError> {
    let unit =
        DoseRateUnit::from_str(label).map_err(|_| UnitError::UnknownUnit(label.to_string()))?;
    Ok(value * unit.multiplier())
}

/// Convert a value to µSv/h. Unknown labels are logged and yield NaN.
pub fn to_canonical(value: f64, label: &str) -> f64 {
    try_to_canonical(value, label).unwrap_or_else(|e| {
        tracing::warn!(label, "{}", e);
        f64::NAN
    })
}

/// Seconds since the start of the month for a day/hour/minute/second stamp,
/// in the same representation as a record's `secs_of_month`
pub fn datetime_to_secs(day: u32, hour: u32, minute: u32, secs: u32) -> u64 {
    u64::from(day) * 24 * 60 * 60
        + u64::from(hour) * 60 * 60
        + u64::from(minute) * 60
        + u64::from(secs)
}
