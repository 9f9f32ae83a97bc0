//! Processing Pipeline Module
//!
//! ```text
//! PHASE 1: Fetch raw streams (concurrent join)
//! PHASE 2: Normalization
//! PHASE 3: Grouping + series
//! PHASE 4: Advisory
//! ```

mod coordinator;

pub use coordinator::{HiveSnapshot, PipelineCoordinator, PipelineError};
