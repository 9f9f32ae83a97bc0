//! Advisory Module
//!
//! Turns the two normalized telemetry streams into a natural-language hive
//! advisory via an injected text-generation backend, with fixed fallback
//! texts for insufficient data and backend failure.

mod orchestrator;
mod prompt;

pub use orchestrator::{
    request_advisory, ADVISORY_UNAVAILABLE, INSUFFICIENT_DATA_ADVISORY,
};
pub use prompt::build_advisory_prompt;
