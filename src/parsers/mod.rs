pub mod radmon;
pub mod types;

pub use radmon::{AlignmentMode, RadMonitor};
pub use types::{MeasurementRecord, ParseError, Parseable, RecordLayout};
