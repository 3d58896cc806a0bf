use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::stage::StageKind;

/// Share of successful calls; `1.0` before any call has been made.
pub fn efficiency(processed: u64, errors: u64) -> f64 {
    let total = processed + errors;
    if total == 0 {
        1.0
    } else {
        processed as f64 / total as f64
    }
}

/// Point-in-time statistics for one pipeline.
///
/// Counters and stage times are cumulative over the pipeline's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStats {
    pub id: String,
    pub adapter: String,
    pub processed: u64,
    pub errors: u64,
    pub efficiency: f64,
    pub stage_times: BTreeMap<StageKind, Duration>,
}

impl PipelineStats {
    /// Total calls, successful or not.
    pub fn calls(&self) -> u64 {
        self.processed + self.errors
    }

    /// Time accumulated by one stage kind, zero if it never ran.
    pub fn stage_time(&self, stage: StageKind) -> Duration {
        self.stage_times.get(&stage).copied().unwrap_or_default()
    }
}
