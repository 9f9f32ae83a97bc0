//! Advisory orchestration - decide, prompt, invoke, absorb failure.
//!
//! The orchestrator never fails the pipeline: whatever happens to the
//! generation call, the caller gets a displayable advisory string.

use super::prompt::build_advisory_prompt;
use crate::llm::LlmBackend;
use crate::types::{AdvisoryResult, EnvironmentReading, MovementEvent};
use tracing::{debug, warn};

/// Served when either telemetry stream is empty.
pub const INSUFFICIENT_DATA_ADVISORY: &str =
    "Not enough telemetry to generate an advisory: both movement events and \
     environment readings are required.";

/// Served when the generation call fails.
pub const ADVISORY_UNAVAILABLE: &str =
    "Advisory generation is currently unavailable. Telemetry summaries are \
     shown without analysis.";

/// Request a hive advisory from the injected text-generation backend.
///
/// Generation is attempted only when both streams hold data; otherwise the
/// fixed insufficient-data text comes back without touching the backend. The
/// backend is invoked exactly once — no retries — and a failed call degrades
/// to the fixed unavailable text rather than propagating.
pub async fn request_advisory(
    events: &[MovementEvent],
    readings: &[EnvironmentReading],
    backend: &dyn LlmBackend,
) -> AdvisoryResult {
    if events.is_empty() || readings.is_empty() {
        debug!(
            events = events.len(),
            readings = readings.len(),
            "insufficient telemetry, skipping advisory generation"
        );
        return AdvisoryResult::new(INSUFFICIENT_DATA_ADVISORY, false);
    }

    let prompt = build_advisory_prompt(events, readings);
    match backend.generate(&prompt).await {
        Ok(text) => AdvisoryResult::new(text, true),
        Err(error) => {
            warn!(
                backend = backend.backend_name(),
                error = %error,
                "advisory generation failed, serving fallback text"
            );
            AdvisoryResult::new(ADVISORY_UNAVAILABLE, true)
        }
    }
}
