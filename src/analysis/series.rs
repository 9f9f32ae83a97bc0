//! Chart-ready time series from environment readings.

use crate::types::EnvironmentReading;
use chrono::SecondsFormat;
use serde::Serialize;

/// Parallel label/value arrays for the two tracked metrics.
///
/// Invariant: all three arrays have equal length and share index-aligned
/// ordering by ascending timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    /// RFC 3339 timestamps, ascending.
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sort readings chronologically and emit the parallel series arrays.
///
/// The sort is stable: readings sharing a timestamp keep their original
/// relative order. Numeric coercion already happened in the normalizer; this
/// stage only reorders and regroups.
pub fn build_series(readings: &[EnvironmentReading]) -> TimeSeries {
    let mut sorted: Vec<&EnvironmentReading> = readings.iter().collect();
    sorted.sort_by_key(|reading| reading.timestamp);

    let mut series = TimeSeries {
        labels: Vec::with_capacity(sorted.len()),
        temperature: Vec::with_capacity(sorted.len()),
        humidity: Vec::with_capacity(sorted.len()),
    };
    for reading in sorted {
        series
            .labels
            .push(reading.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true));
        series.temperature.push(reading.temperature);
        series.humidity.push(reading.humidity);
    }
    series
}

/// The single most recent reading: maximum timestamp, ties broken by latest
/// input position. `None` on empty input — never a default-valued record.
pub fn latest_reading(readings: &[EnvironmentReading]) -> Option<&EnvironmentReading> {
    readings
        .iter()
        .enumerate()
        .max_by_key(|(position, reading)| (reading.timestamp, *position))
        .map(|(_, reading)| reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn make_reading(timestamp: &str, temperature: f64, humidity: f64) -> EnvironmentReading {
        EnvironmentReading {
            sensor_id: "sensor_1".to_string(),
            timestamp: timestamp.parse::<DateTime<Utc>>().unwrap(),
            temperature,
            humidity,
        }
    }

    #[test]
    fn series_arrays_are_equal_length_and_ascending() {
        let readings = vec![
            make_reading("2024-05-01T10:00:00Z", 21.5, 60.0),
            make_reading("2024-05-01T09:00:00Z", 20.0, 58.0),
            make_reading("2024-05-01T11:00:00Z", 22.0, 62.0),
        ];
        let series = build_series(&readings);

        assert_eq!(series.len(), readings.len());
        assert_eq!(series.temperature.len(), series.labels.len());
        assert_eq!(series.humidity.len(), series.labels.len());
        let mut sorted_labels = series.labels.clone();
        sorted_labels.sort();
        assert_eq!(series.labels, sorted_labels, "labels must be non-decreasing");
        assert_eq!(series.temperature, vec![20.0, 21.5, 22.0]);
        assert_eq!(series.humidity, vec![58.0, 60.0, 62.0]);
    }

    #[test]
    fn identical_timestamps_keep_original_relative_order() {
        let readings = vec![
            make_reading("2024-05-01T09:00:00Z", 1.0, 10.0),
            make_reading("2024-05-01T09:00:00Z", 2.0, 20.0),
            make_reading("2024-05-01T08:00:00Z", 0.0, 5.0),
        ];
        let series = build_series(&readings);
        assert_eq!(series.temperature, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = build_series(&[]);
        assert!(series.is_empty());
        assert!(series.temperature.is_empty());
        assert!(series.humidity.is_empty());
    }

    #[test]
    fn latest_is_none_on_empty_input() {
        assert!(latest_reading(&[]).is_none());
    }

    #[test]
    fn latest_is_the_maximum_timestamp() {
        let readings = vec![
            make_reading("2024-05-01T10:00:00Z", 21.5, 60.0),
            make_reading("2024-05-01T09:00:00Z", 20.0, 58.0),
        ];
        let latest = latest_reading(&readings).unwrap();
        assert_eq!(latest.temperature, 21.5);
    }

    #[test]
    fn latest_ties_break_toward_latest_input_position() {
        let readings = vec![
            make_reading("2024-05-01T10:00:00Z", 1.0, 10.0),
            make_reading("2024-05-01T10:00:00Z", 2.0, 20.0),
        ];
        let latest = latest_reading(&readings).unwrap();
        assert_eq!(latest.temperature, 2.0);
    }
}
