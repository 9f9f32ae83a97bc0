//! Pipeline Coordinator - one fetch cycle from raw records to snapshot
//!
//! ```text
//! PHASE 1: Fetch both raw streams (concurrent, join point)
//! PHASE 2: Normalize each stream (rejects excluded, substitutions counted)
//! PHASE 3: Date grouping + series building + latest reading
//! PHASE 4: Advisory orchestration (absorbs its own failures)
//! ```
//!
//! Only Phase 1 can fail the run: without raw data nothing downstream is
//! meaningful. Everything after it degrades gracefully, so a run always ends
//! in either a complete snapshot or one fatal error — never a partially
//! populated structure.

use crate::advisory::request_advisory;
use crate::analysis::{build_series, group_by_date, latest_reading, DateGroup, TimeSeries};
use crate::ingest::{
    normalize_environment_stream, normalize_movement_stream, EnvironmentSource, IngestError,
    MovementSource, NormalizationReport,
};
use crate::llm::LlmBackend;
use crate::types::{AdvisoryResult, EnvironmentReading};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Fatal pipeline failure: one of the raw-stream fetches did not complete.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("movement stream fetch failed: {0}")]
    MovementFetch(#[source] IngestError),

    #[error("environment stream fetch failed: {0}")]
    EnvironmentFetch(#[source] IngestError),
}

/// Consolidated result of one pipeline run, consumed read-only by the
/// presentation layer. Owned exclusively by the caller; nothing is shared or
/// cached across runs.
#[derive(Debug, Clone, Serialize)]
pub struct HiveSnapshot {
    /// Date-grouped activity, most recent day first.
    pub groups: Vec<DateGroup>,
    /// Chronological temperature/humidity series.
    pub series: TimeSeries,
    /// Most recent environment reading, if any exist.
    pub latest: Option<EnvironmentReading>,
    /// Advisory text (generated or fixed fallback).
    pub advisory: AdvisoryResult,
}

/// Sequences fetch → normalize → analyze → advise for one cycle.
pub struct PipelineCoordinator {
    /// Observer's zone for calendar-day grouping.
    tz: Tz,
}

impl PipelineCoordinator {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Run one full pipeline cycle.
    ///
    /// The two raw fetches run concurrently and both must land before any
    /// downstream work starts; either failure aborts the run with the stream
    /// named in the error.
    pub async fn run(
        &self,
        movements: &dyn MovementSource,
        environment: &dyn EnvironmentSource,
        backend: &dyn LlmBackend,
    ) -> Result<HiveSnapshot, PipelineError> {
        let (raw_movements, raw_readings) = tokio::try_join!(
            async {
                movements
                    .fetch_movements()
                    .await
                    .map_err(PipelineError::MovementFetch)
            },
            async {
                environment
                    .fetch_environment()
                    .await
                    .map_err(PipelineError::EnvironmentFetch)
            },
        )?;

        let (events, movement_report) = normalize_movement_stream(&raw_movements);
        let (readings, environment_report) = normalize_environment_stream(&raw_readings);
        log_report("movement", movements.source_name(), &movement_report);
        log_report("environment", environment.source_name(), &environment_report);

        let groups = group_by_date(&events, self.tz);
        let series = build_series(&readings);
        let latest = latest_reading(&readings).cloned();
        let advisory = request_advisory(&events, &readings, backend).await;

        Ok(HiveSnapshot {
            groups,
            series,
            latest,
            advisory,
        })
    }
}

fn log_report(stream: &'static str, source: &str, report: &NormalizationReport) {
    info!(
        stream,
        source,
        accepted = report.accepted,
        rejected = report.rejected,
        substituted_values = report.substituted_values,
        "stream normalized"
    );
}
