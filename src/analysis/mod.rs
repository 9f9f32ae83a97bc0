//! Telemetry Analysis Module
//!
//! Deterministic views over normalized telemetry: the date-grouped activity
//! summary and the chronological chart series with its latest reading.

mod grouping;
mod series;

pub use grouping::{group_by_date, DateGroup};
pub use series::{build_series, latest_reading, TimeSeries};
