//! Record normalization - heterogeneous raw records to canonical shapes
//!
//! Raw hive records arrive in three shapes depending on which path they took
//! through the upstream plumbing:
//!
//! - flat: `{"timestamp": "...", "bee_type": "bee_in"}`
//! - payload-wrapped: `{"sensor_id": "...", "payload": {"temperature": 32.1}}`
//! - typed-attribute encoded: `{"bee_type": {"S": "bee_in"}}` (raw DynamoDB
//!   attribute values)
//!
//! Field resolution checks the top-level field, then `payload.<field>`, and
//! unwraps a typed-attribute value wherever one is found; first match wins.
//!
//! Ambiguous input is a first-class outcome, not silent coercion: an
//! unrecognized movement type or a missing/unparsable timestamp rejects the
//! record, while unparsable temperature/humidity values substitute 0.0 and
//! flag the substitution so a genuine zero reading stays distinguishable in
//! the run report.

use crate::types::{EnvironmentReading, MovementEvent, MovementKind, RawRecord};
use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::warn;

/// Why a single raw record was excluded from the pipeline run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unparsable timestamp `{0}`")]
    InvalidTimestamp(String),

    #[error("unknown movement kind `{0}`")]
    UnknownMovementKind(String),
}

/// Per-stream counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Records that normalized cleanly.
    pub accepted: usize,
    /// Records excluded with a [`RecordRejection`].
    pub rejected: usize,
    /// Temperature/humidity values replaced by 0.0 (missing or unparsable).
    pub substituted_values: usize,
}

/// Outcome of normalizing one environment record.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReading {
    pub reading: EnvironmentReading,
    /// Fields whose values were absent or unparsable and were replaced by 0.0.
    pub substituted: Vec<&'static str>,
}

// ============================================================================
// Field resolution
// ============================================================================

/// Unwrap a DynamoDB-style typed attribute (`{"S": v}` / `{"N": v}`),
/// passing any other value through untouched.
fn unwrap_attr(value: &RawRecord) -> &RawRecord {
    if let Some(map) = value.as_object() {
        if map.len() == 1 {
            if let Some(inner) = map.get("S").or_else(|| map.get("N")) {
                return inner;
            }
        }
    }
    value
}

/// Resolve a field: top-level first, then `payload.<field>`, then unwrap a
/// typed-attribute encoding on whatever was found.
fn resolve_field<'a>(raw: &'a RawRecord, name: &str) -> Option<&'a RawRecord> {
    let object = raw.as_object()?;
    let found = object
        .get(name)
        .or_else(|| object.get("payload").map(unwrap_attr)?.get(name))?;
    Some(unwrap_attr(found))
}

fn field_as_str<'a>(raw: &'a RawRecord, name: &str) -> Option<&'a str> {
    resolve_field(raw, name)?.as_str()
}

/// Resolve a numeric field, accepting JSON numbers and numeric strings.
/// `None` means absent or unparsable — the caller substitutes.
fn field_as_f64(raw: &RawRecord, name: &str) -> Option<f64> {
    let value = resolve_field(raw, name)?;
    let parsed = match value {
        RawRecord::Number(n) => n.as_f64(),
        RawRecord::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse an ISO-8601 timestamp. Sensor clocks sometimes ship naive datetimes
/// with no offset; those are interpreted as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

fn required_timestamp(raw: &RawRecord) -> Result<DateTime<Utc>, RecordRejection> {
    let text = field_as_str(raw, "timestamp")
        .ok_or(RecordRejection::MissingField("timestamp"))?;
    parse_timestamp(text).ok_or_else(|| RecordRejection::InvalidTimestamp(text.to_string()))
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize one raw movement record.
pub fn normalize_movement(raw: &RawRecord) -> Result<MovementEvent, RecordRejection> {
    if !raw.is_object() {
        return Err(RecordRejection::NotAnObject);
    }
    let timestamp = required_timestamp(raw)?;
    let kind_text =
        field_as_str(raw, "bee_type").ok_or(RecordRejection::MissingField("bee_type"))?;
    let kind = MovementKind::classify(kind_text)
        .ok_or_else(|| RecordRejection::UnknownMovementKind(kind_text.to_string()))?;

    Ok(MovementEvent { timestamp, kind })
}

/// Normalize one raw environment record.
///
/// A record with no sensor identity or no position on the time axis cannot
/// enter the series and is rejected. Temperature/humidity never reject:
/// anything unparsable becomes 0.0 with the substitution reported.
pub fn normalize_environment(raw: &RawRecord) -> Result<NormalizedReading, RecordRejection> {
    if !raw.is_object() {
        return Err(RecordRejection::NotAnObject);
    }
    let sensor_id = field_as_str(raw, "sensor_id")
        .ok_or(RecordRejection::MissingField("sensor_id"))?
        .to_string();
    let timestamp = required_timestamp(raw)?;

    let mut substituted = Vec::new();
    let temperature = field_as_f64(raw, "temperature").unwrap_or_else(|| {
        substituted.push("temperature");
        0.0
    });
    let humidity = field_as_f64(raw, "humidity").unwrap_or_else(|| {
        substituted.push("humidity");
        0.0
    });

    Ok(NormalizedReading {
        reading: EnvironmentReading {
            sensor_id,
            timestamp,
            temperature,
            humidity,
        },
        substituted,
    })
}

// ============================================================================
// Stream helpers
// ============================================================================

/// Normalize a fetched movement stream, excluding and logging rejects.
pub fn normalize_movement_stream(raws: &[RawRecord]) -> (Vec<MovementEvent>, NormalizationReport) {
    let mut events = Vec::with_capacity(raws.len());
    let mut report = NormalizationReport::default();

    for raw in raws {
        match normalize_movement(raw) {
            Ok(event) => {
                events.push(event);
                report.accepted += 1;
            }
            Err(rejection) => {
                warn!(stream = "movement", %rejection, "record rejected");
                report.rejected += 1;
            }
        }
    }

    (events, report)
}

/// Normalize a fetched environment stream, excluding and logging rejects and
/// counting 0.0 substitutions.
pub fn normalize_environment_stream(
    raws: &[RawRecord],
) -> (Vec<EnvironmentReading>, NormalizationReport) {
    let mut readings = Vec::with_capacity(raws.len());
    let mut report = NormalizationReport::default();

    for raw in raws {
        match normalize_environment(raw) {
            Ok(normalized) => {
                if !normalized.substituted.is_empty() {
                    warn!(
                        stream = "environment",
                        sensor_id = %normalized.reading.sensor_id,
                        fields = ?normalized.substituted,
                        "unparsable values substituted with 0.0"
                    );
                    report.substituted_values += normalized.substituted.len();
                }
                readings.push(normalized.reading);
                report.accepted += 1;
            }
            Err(rejection) => {
                warn!(stream = "environment", %rejection, "record rejected");
                report.rejected += 1;
            }
        }
    }

    (readings, report)
}
