use std::sync::Arc;

use nexus_ingest::sample_stream;
use nexus_model::Record;

use crate::chain::StageChain;
use crate::error::{AdapterError, Result};
use crate::pipeline::{AdapterKind, Pipeline};
use crate::stages::Stage;

/// Accepts a sequence of readings.
///
/// Any text input is a sentinel that expands to the built-in sample
/// sequence.
#[derive(Debug)]
pub struct StreamAdapter {
    chain: StageChain,
}

impl StreamAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            chain: StageChain::new(id),
        }
    }

    #[must_use]
    pub fn with_default_stages(mut self) -> Self {
        self.chain.add_default_stages();
        self
    }

    #[must_use]
    pub fn with_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.chain.add_stage(stage);
        self
    }

    fn prepare(raw: Record) -> std::result::Result<Record, AdapterError> {
        match raw {
            Record::Text(_) => Ok(Record::Sequence(sample_stream())),
            Record::Sequence(items) => Ok(Record::Sequence(items)),
            other => Err(AdapterError::ExpectsTextOrSequence {
                found: other.type_name(),
            }),
        }
    }
}

impl Pipeline for StreamAdapter {
    fn adapter(&self) -> AdapterKind {
        AdapterKind::Stream
    }

    fn chain(&self) -> &StageChain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut StageChain {
        &mut self.chain
    }

    fn process(&mut self, raw: Record) -> Result<Record> {
        let result =
            Self::prepare(raw).and_then(|record| self.chain.run(record).map_err(AdapterError::from));
        self.chain.finish(AdapterKind::Stream, result)
    }
}
