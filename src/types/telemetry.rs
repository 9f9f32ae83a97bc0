//! Canonical telemetry shapes produced by the record normalizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Untyped raw record as fetched from a telemetry source.
///
/// Sources yield whatever the upstream table or endpoint holds; fields may be
/// flat, nested under a `payload` wrapper, or encoded as typed attributes
/// (`{"S": "..."}` / `{"N": "..."}`). Only the normalizer looks inside.
pub type RawRecord = serde_json::Value;

/// Direction of a single detected bee movement.
///
/// The wire vocabulary (`bee_in` / `bee_out`) is the gate sensor's and is kept
/// for serialization so normalized events round-trip against recorded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "bee_in")]
    Enter,
    #[serde(rename = "bee_out")]
    Exit,
}

impl MovementKind {
    /// Classify a raw type string. Exact match only — anything outside the
    /// two-value vocabulary is a normalization rejection, never collapsed
    /// onto a default direction.
    pub fn classify(raw: &str) -> Option<Self> {
        match raw {
            "bee_in" => Some(MovementKind::Enter),
            "bee_out" => Some(MovementKind::Exit),
            _ => None,
        }
    }

    /// Wire string for this direction.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            MovementKind::Enter => "bee_in",
            MovementKind::Exit => "bee_out",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// A single sensor-detected entry or exit of a bee. Immutable once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "bee_type")]
    pub kind: MovementKind,
}

/// A timestamped temperature/humidity sample from a hive sensor.
///
/// Invariant: `temperature` and `humidity` are always finite — the normalizer
/// substitutes 0.0 for anything it cannot parse and flags the substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}
