//! Shared data structures for the beehive telemetry pipeline
//!
//! This module defines the canonical types the pipeline operates on:
//! - Normalizer output: MovementEvent, EnvironmentReading
//! - Advisory output: AdvisoryResult

mod advisory;
mod telemetry;

pub use advisory::*;
pub use telemetry::*;
