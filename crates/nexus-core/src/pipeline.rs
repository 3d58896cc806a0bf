//! The uniform processing contract shared by every adapter.

use std::fmt;
use std::sync::Arc;

use nexus_model::{PipelineStats, Record};
use serde::{Deserialize, Serialize};

use crate::chain::StageChain;
use crate::error::Result;
use crate::stages::Stage;

/// The external encoding an adapter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    Json,
    Csv,
    Stream,
}

impl AdapterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Stream => "Stream",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named stage chain behind an input adapter.
///
/// Implementations convert raw input into a canonical record, run it through
/// their [`StageChain`], and report the outcome through
/// [`StageChain::finish`] so counters stay accurate. Every failure surfaces
/// as [`PipelineError::Adapter`](crate::PipelineError::Adapter).
pub trait Pipeline: Send {
    fn adapter(&self) -> AdapterKind;

    fn chain(&self) -> &StageChain;

    fn chain_mut(&mut self) -> &mut StageChain;

    /// Process one input value.
    ///
    /// # Errors
    ///
    /// Returns an adapter failure naming this pipeline when the input shape is
    /// rejected, decoding fails, or any stage fails.
    fn process(&mut self, raw: Record) -> Result<Record>;

    /// Identifier, unique within a manager.
    fn id(&self) -> &str {
        self.chain().id()
    }

    fn add_stage(&mut self, stage: Arc<dyn Stage>) {
        self.chain_mut().add_stage(stage);
    }

    /// Snapshot of counters and cumulative stage times.
    fn stats(&self) -> PipelineStats {
        self.chain().stats(self.adapter())
    }

    /// Stage names in execution order.
    fn stage_names(&self) -> Vec<&str> {
        self.chain().stage_names()
    }
}
