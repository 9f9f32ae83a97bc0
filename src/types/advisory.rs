//! Advisory output types.

use serde::{Deserialize, Serialize};

/// Outcome of one advisory orchestration.
///
/// Always carries a displayable string: either model-generated advice, the
/// fixed insufficient-data message, or the fixed unavailable message.
/// `source_data_sufficient` tells the presentation layer whether both
/// telemetry streams held data when the advisory was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub text: String,
    pub source_data_sufficient: bool,
}

impl AdvisoryResult {
    pub fn new(text: impl Into<String>, source_data_sufficient: bool) -> Self {
        Self {
            text: text.into(),
            source_data_sufficient,
        }
    }
}
