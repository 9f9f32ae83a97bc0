//! Pipeline Integration Tests
//!
//! Drives the full coordinator — fetch, normalize, group, series, advisory —
//! with in-memory sources and a scripted generation backend, covering the
//! three reference scenarios: mixed-day activity grouping, out-of-order
//! string-valued readings, and the empty-telemetry fallback.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hive_os::advisory::INSUFFICIENT_DATA_ADVISORY;
use hive_os::ingest::{EnvironmentSource, IngestError, MovementSource};
use hive_os::llm::LlmBackend;
use hive_os::types::{MovementKind, RawRecord};
use hive_os::PipelineCoordinator;

// ============================================================================
// Test doubles
// ============================================================================

/// In-memory raw-record source standing in for the live table reads.
struct StaticSource {
    records: Vec<RawRecord>,
}

impl StaticSource {
    fn with(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl MovementSource for StaticSource {
    async fn fetch_movements(&self) -> Result<Vec<RawRecord>, IngestError> {
        Ok(self.records.clone())
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

#[async_trait]
impl EnvironmentSource for StaticSource {
    async fn fetch_environment(&self) -> Result<Vec<RawRecord>, IngestError> {
        Ok(self.records.clone())
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

/// Generation backend double: fixed reply, remembers the prompts it saw.
struct RecordingBackend {
    reply: &'static str,
    calls: AtomicUsize,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl RecordingBackend {
    fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: std::sync::Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmBackend for RecordingBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.to_string())
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

struct FailingBackend;

#[async_trait]
impl LlmBackend for FailingBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        bail!("inference service down")
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Scenario A: movement grouping
// ============================================================================

#[tokio::test]
async fn scenario_a_movements_group_by_descending_date() {
    let movements = StaticSource::with(vec![
        json!({"timestamp": "2024-05-01T08:00:00Z", "bee_type": "bee_in"}),
        json!({"timestamp": "2024-05-01T09:00:00Z", "bee_type": "bee_out"}),
        json!({"timestamp": "2024-05-02T08:00:00Z", "bee_type": "bee_in"}),
    ]);
    let environment = StaticSource::with(vec![json!({
        "sensor_id": "sensor_1",
        "timestamp": "2024-05-01T10:00:00Z",
        "temperature": 21.5,
        "humidity": 60.0
    })]);
    let backend = RecordingBackend::replying("advice");

    let coordinator = PipelineCoordinator::new(chrono_tz::UTC);
    let snapshot = coordinator
        .run(&movements, &environment, backend.as_ref())
        .await
        .unwrap();

    assert_eq!(snapshot.groups.len(), 2);

    assert_eq!(snapshot.groups[0].date, date(2024, 5, 2));
    assert_eq!(snapshot.groups[0].event_count, 1);
    assert_eq!(snapshot.groups[0].events[0].kind, MovementKind::Enter);

    assert_eq!(snapshot.groups[1].date, date(2024, 5, 1));
    assert_eq!(snapshot.groups[1].event_count, 2);
    assert_eq!(snapshot.groups[1].events[0].kind, MovementKind::Enter);
    assert_eq!(snapshot.groups[1].events[1].kind, MovementKind::Exit);
}

// ============================================================================
// Scenario B: out-of-order, string-valued readings
// ============================================================================

#[tokio::test]
async fn scenario_b_series_sorts_and_coerces_string_readings() {
    let movements = StaticSource::with(vec![
        json!({"timestamp": "2024-05-01T08:00:00Z", "bee_type": "bee_in"}),
    ]);
    let environment = StaticSource::with(vec![
        json!({
            "sensor_id": "sensor_1",
            "timestamp": "2024-05-01T10:00:00Z",
            "payload": {"temperature": "21.5", "humidity": "60"}
        }),
        json!({
            "sensor_id": "sensor_1",
            "timestamp": "2024-05-01T09:00:00Z",
            "payload": {"temperature": "20.0", "humidity": "58"}
        }),
    ]);
    let backend = RecordingBackend::replying("advice");

    let coordinator = PipelineCoordinator::new(chrono_tz::UTC);
    let snapshot = coordinator
        .run(&movements, &environment, backend.as_ref())
        .await
        .unwrap();

    assert_eq!(snapshot.series.labels.len(), 2);
    assert!(snapshot.series.labels[0].starts_with("2024-05-01T09:00:00"));
    assert!(snapshot.series.labels[1].starts_with("2024-05-01T10:00:00"));
    assert_eq!(snapshot.series.temperature, vec![20.0, 21.5]);
    assert_eq!(snapshot.series.humidity, vec![58.0, 60.0]);

    let latest = snapshot.latest.expect("latest reading must exist");
    assert_eq!(latest.temperature, 21.5);
    assert_eq!(latest.humidity, 60.0);
}

// ============================================================================
// Scenario C: empty telemetry
// ============================================================================

#[tokio::test]
async fn scenario_c_empty_telemetry_yields_insufficient_data_advisory() {
    let movements = StaticSource::with(vec![]);
    let environment = StaticSource::with(vec![]);
    let backend = RecordingBackend::replying("never seen");

    let coordinator = PipelineCoordinator::new(chrono_tz::UTC);
    let snapshot = coordinator
        .run(&movements, &environment, backend.as_ref())
        .await
        .expect("an empty fetch still succeeds");

    assert!(snapshot.groups.is_empty());
    assert!(snapshot.series.is_empty());
    assert!(snapshot.latest.is_none());
    assert_eq!(snapshot.advisory.text, INSUFFICIENT_DATA_ADVISORY);
    assert!(!snapshot.advisory.source_data_sufficient);
    assert_eq!(backend.call_count(), 0, "generation must not be invoked");
}

// ============================================================================
// Advisory plumbing through the full pipeline
// ============================================================================

#[tokio::test]
async fn advisory_prompt_carries_normalized_telemetry() {
    let movements = StaticSource::with(vec![
        json!({"timestamp": "2024-05-01T08:00:00Z", "bee_type": "bee_in"}),
    ]);
    let environment = StaticSource::with(vec![json!({
        "sensor_id": "sensor_7",
        "timestamp": "2024-05-01T10:00:00Z",
        "temperature": 33.25,
        "humidity": 48.0
    })]);
    let backend = RecordingBackend::replying("Watch the brood temperature.");

    let coordinator = PipelineCoordinator::new(chrono_tz::UTC);
    let snapshot = coordinator
        .run(&movements, &environment, backend.as_ref())
        .await
        .unwrap();

    assert_eq!(snapshot.advisory.text, "Watch the brood temperature.");
    assert!(snapshot.advisory.source_data_sufficient);
    assert_eq!(backend.call_count(), 1);

    let prompt = backend.last_prompt().unwrap();
    assert!(prompt.contains("bee_in"));
    assert!(prompt.contains("sensor_7"));
    assert!(prompt.contains("33.25"));
}

#[tokio::test]
async fn backend_failure_degrades_to_fallback_text_with_full_views() {
    let movements = StaticSource::with(vec![
        json!({"timestamp": "2024-05-01T08:00:00Z", "bee_type": "bee_out"}),
    ]);
    let environment = StaticSource::with(vec![json!({
        "sensor_id": "sensor_1",
        "timestamp": "2024-05-01T10:00:00Z",
        "temperature": 21.5,
        "humidity": 60.0
    })]);

    let coordinator = PipelineCoordinator::new(chrono_tz::UTC);
    let snapshot = coordinator
        .run(&movements, &environment, &FailingBackend)
        .await
        .expect("backend failure must not fail the run");

    // The snapshot is still complete: views intact, fallback advisory text.
    assert_eq!(snapshot.groups.len(), 1);
    assert_eq!(snapshot.series.labels.len(), 1);
    assert!(snapshot.latest.is_some());
    assert_eq!(snapshot.advisory.text, hive_os::advisory::ADVISORY_UNAVAILABLE);
    assert!(snapshot.advisory.source_data_sufficient);
}

// ============================================================================
// Timezone-sensitive grouping through the full pipeline
// ============================================================================

#[tokio::test]
async fn grouping_respects_the_observer_zone() {
    // 23:00 UTC on May 1st is 08:00 May 2nd in Tokyo.
    let movements = StaticSource::with(vec![
        json!({"timestamp": "2024-05-01T23:00:00Z", "bee_type": "bee_in"}),
    ]);
    let environment = StaticSource::with(vec![json!({
        "sensor_id": "sensor_1",
        "timestamp": "2024-05-01T23:00:00Z",
        "temperature": 18.0,
        "humidity": 65.0
    })]);
    let backend = RecordingBackend::replying("advice");

    let tokyo = PipelineCoordinator::new(chrono_tz::Asia::Tokyo);
    let snapshot = tokyo
        .run(&movements, &environment, backend.as_ref())
        .await
        .unwrap();

    assert_eq!(snapshot.groups[0].date, date(2024, 5, 2));
}
