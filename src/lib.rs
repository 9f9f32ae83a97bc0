//! HIVE-OS: Beehive Operational Intelligence
//!
//! Telemetry aggregation and advisory pipeline for IoT beehive monitors.
//!
//! ## Architecture
//!
//! - **Ingest**: raw record sources (HTTP endpoint or file replay) and the
//!   normalizer that turns heterogeneous records into canonical shapes
//! - **Analysis**: date-grouped activity summary and chart-ready time series
//! - **Advisory**: bounded prompt assembly and LLM-backed hive advisories
//!   with graceful fallback
//! - **Pipeline**: coordinator sequencing fetch → normalize → analyze → advise

pub mod advisory;
pub mod analysis;
pub mod api;
pub mod config;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod types;

// Re-export configuration
pub use config::HiveConfig;

// Re-export commonly used types
pub use types::{AdvisoryResult, EnvironmentReading, MovementEvent, MovementKind};

// Re-export analysis views
pub use analysis::{build_series, group_by_date, latest_reading, DateGroup, TimeSeries};

// Re-export ingest components
pub use ingest::{
    normalize_environment, normalize_movement, EnvironmentSource, IngestError, MovementSource,
    NormalizationReport, RecordRejection,
};

// Re-export LLM components
pub use llm::{LlmBackend, OpenAiCompatBackend};

// Re-export pipeline components
pub use pipeline::{HiveSnapshot, PipelineCoordinator, PipelineError};
