//! Raw telemetry source abstraction.
//!
//! Provides unified traits for fetching raw hive records from different
//! backends: the live HTTP telemetry endpoint, or JSON files (replay).
//! Sources return untyped records; normalization happens downstream.
//!
//! One read attempt per fetch — retry/backoff is deliberately not this
//! layer's job.

use crate::types::RawRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Timeout for a single telemetry endpoint read.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Why a raw-stream fetch failed. Fatal to the pipeline run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed telemetry payload: {0}")]
    Decode(String),
}

/// Source of raw movement (entry/exit) records.
#[async_trait]
pub trait MovementSource: Send + Sync {
    /// Fetch the full raw movement stream. Single attempt.
    async fn fetch_movements(&self) -> Result<Vec<RawRecord>, IngestError>;

    /// Human-readable name for logging (e.g. "replay", "http").
    fn source_name(&self) -> &str;
}

/// Source of raw environment (temperature/humidity) records.
#[async_trait]
pub trait EnvironmentSource: Send + Sync {
    /// Fetch the raw environment stream, newest-first capped by the source's
    /// configured limit. Single attempt.
    async fn fetch_environment(&self) -> Result<Vec<RawRecord>, IngestError>;

    /// Human-readable name for logging.
    fn source_name(&self) -> &str;
}

// ============================================================================
// Replay Source (JSON file)
// ============================================================================

/// Replays raw records from a JSON file holding an array of objects.
///
/// Stands in for the live table reads during local runs and tests, the same
/// way recorded data replays stand in for live rig feeds.
pub struct ReplaySource {
    path: PathBuf,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_records(&self) -> Result<Vec<RawRecord>, IngestError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| IngestError::File {
                path: self.path.clone(),
                source,
            })?;
        let value: RawRecord = serde_json::from_str(&contents)
            .map_err(|e| IngestError::Decode(format!("{}: {}", self.path.display(), e)))?;
        match value {
            RawRecord::Array(records) => {
                debug!(path = %self.path.display(), count = records.len(), "replay records loaded");
                Ok(records)
            }
            other => Err(IngestError::Decode(format!(
                "{}: expected a JSON array of records, got {}",
                self.path.display(),
                json_type_name(&other)
            ))),
        }
    }
}

#[async_trait]
impl MovementSource for ReplaySource {
    async fn fetch_movements(&self) -> Result<Vec<RawRecord>, IngestError> {
        self.read_records().await
    }

    fn source_name(&self) -> &str {
        "replay"
    }
}

#[async_trait]
impl EnvironmentSource for ReplaySource {
    async fn fetch_environment(&self) -> Result<Vec<RawRecord>, IngestError> {
        self.read_records().await
    }

    fn source_name(&self) -> &str {
        "replay"
    }
}

fn json_type_name(value: &RawRecord) -> &'static str {
    match value {
        RawRecord::Null => "null",
        RawRecord::Bool(_) => "a boolean",
        RawRecord::Number(_) => "a number",
        RawRecord::String(_) => "a string",
        RawRecord::Array(_) => "an array",
        RawRecord::Object(_) => "an object",
    }
}

// ============================================================================
// HTTP Source (telemetry endpoint)
// ============================================================================

/// Reads both raw streams from the hive telemetry HTTP endpoint.
///
/// The endpoint is an API-gateway front: the JSON data object either arrives
/// directly, or stringified under a `body` field. Both shapes decode to the
/// same record set.
pub struct HttpTelemetrySource {
    client: reqwest::Client,
    endpoint: String,
    movement_key: String,
    environment_key: String,
    environment_limit: usize,
}

impl HttpTelemetrySource {
    pub fn new(
        endpoint: impl Into<String>,
        movement_key: impl Into<String>,
        environment_key: impl Into<String>,
        environment_limit: usize,
    ) -> Result<Self, IngestError> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|source| IngestError::Request {
                url: endpoint.clone(),
                source,
            })?;
        Ok(Self {
            client,
            endpoint,
            movement_key: movement_key.into(),
            environment_key: environment_key.into(),
            environment_limit,
        })
    }

    /// Unwrap the optional API-gateway envelope: `{"body": "<json string>"}`
    /// becomes the parsed inner object; anything else passes through.
    pub fn decode_endpoint_payload(value: RawRecord) -> Result<RawRecord, IngestError> {
        match value.get("body").and_then(RawRecord::as_str) {
            Some(body) => serde_json::from_str(body)
                .map_err(|e| IngestError::Decode(format!("gateway body is not valid JSON: {e}"))),
            None => Ok(value),
        }
    }

    async fn fetch_payload(&self) -> Result<RawRecord, IngestError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|source| IngestError::Request {
                url: self.endpoint.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                url: self.endpoint.clone(),
                status,
            });
        }
        let value: RawRecord =
            response
                .json()
                .await
                .map_err(|source| IngestError::Request {
                    url: self.endpoint.clone(),
                    source,
                })?;
        Self::decode_endpoint_payload(value)
    }

    fn extract_stream(payload: &RawRecord, key: &str) -> Result<Vec<RawRecord>, IngestError> {
        payload
            .get(key)
            .and_then(RawRecord::as_array)
            .cloned()
            .ok_or_else(|| {
                IngestError::Decode(format!("endpoint payload has no `{key}` record array"))
            })
    }
}

#[async_trait]
impl MovementSource for HttpTelemetrySource {
    async fn fetch_movements(&self) -> Result<Vec<RawRecord>, IngestError> {
        let payload = self.fetch_payload().await?;
        Self::extract_stream(&payload, &self.movement_key)
    }

    fn source_name(&self) -> &str {
        "http"
    }
}

#[async_trait]
impl EnvironmentSource for HttpTelemetrySource {
    async fn fetch_environment(&self) -> Result<Vec<RawRecord>, IngestError> {
        let payload = self.fetch_payload().await?;
        let mut records = Self::extract_stream(&payload, &self.environment_key)?;
        // The endpoint serves newest-first; the limit mirrors the upstream
        // query window of recent readings.
        if self.environment_limit > 0 {
            records.truncate(self.environment_limit);
        }
        Ok(records)
    }

    fn source_name(&self) -> &str {
        "http"
    }
}
