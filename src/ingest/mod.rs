//! Telemetry Ingestion Module
//!
//! Raw record sources plus the normalizer that converts heterogeneous record
//! shapes into the canonical types the analysis layer consumes.

mod normalizer;
pub mod source;

pub use normalizer::{
    normalize_environment, normalize_environment_stream, normalize_movement,
    normalize_movement_stream, NormalizationReport, NormalizedReading, RecordRejection,
};
pub use source::{
    EnvironmentSource, HttpTelemetrySource, IngestError, MovementSource, ReplaySource,
};
