//! Advisory prompt template.
//!
//! One fixed template, deterministic for a given input set: the two
//! serialized telemetry collections plus the four analysis directives. No
//! randomness and no truncation — summarizing oversized telemetry before
//! embedding is an extension point, not current behavior.

use crate::types::{EnvironmentReading, MovementEvent};

/// Prompt for hive advisory generation.
const HIVE_ADVISORY_PROMPT: &str = r#"You are the advisory AI for a beehive monitoring system.
Analyze the hive telemetry below and assess colony activity and environmental conditions.

### MOVEMENT EVENTS
{events}

### ENVIRONMENT READINGS
{readings}

### INSTRUCTIONS
1. Assess the frequency of entries and exits and the times of day activity concentrates.
2. Evaluate how temperature and humidity changes relate to hive activity.
3. Detect anomalous activity or environmental conditions.
4. Infer the likely health state of the hive.

Finish with an overall assessment and three actionable recommendations for hive management."#;

/// Build the advisory prompt from normalized telemetry.
pub fn build_advisory_prompt(
    events: &[MovementEvent],
    readings: &[EnvironmentReading],
) -> String {
    let events_json =
        serde_json::to_string_pretty(events).unwrap_or_else(|_| "[]".to_string());
    let readings_json =
        serde_json::to_string_pretty(readings).unwrap_or_else(|_| "[]".to_string());

    HIVE_ADVISORY_PROMPT
        .replace("{events}", &events_json)
        .replace("{readings}", &readings_json)
}
