//! Ordered stage execution with per-pipeline instrumentation.
//!
//! [`StageChain`] is the state every adapter shares: the pipeline
//! identifier, the ordered stage list, success/failure counters and the
//! cumulative time spent in each [`StageKind`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use nexus_model::{PipelineStats, Record, StageError, StageKind, efficiency};
use tracing::debug;

use crate::error::{AdapterError, PipelineError};
use crate::pipeline::AdapterKind;
use crate::stages::{Stage, default_stages};

pub struct StageChain {
    id: String,
    stages: Vec<Arc<dyn Stage>>,
    processed: u64,
    errors: u64,
    stage_times: BTreeMap<StageKind, Duration>,
}

impl StageChain {
    /// Create an empty chain for the pipeline `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stages: Vec::new(),
            processed: 0,
            errors: 0,
            stage_times: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a stage to the end of the chain.
    pub fn add_stage(&mut self, stage: Arc<dyn Stage>) {
        self.stages.push(stage);
    }

    /// Insert a stage at a specific position.
    pub fn insert_stage(&mut self, index: usize, stage: Arc<dyn Stage>) {
        self.stages.insert(index, stage);
    }

    /// Remove every stage with the given name.
    pub fn remove_stage(&mut self, name: &str) {
        self.stages.retain(|stage| stage.name() != name);
    }

    /// Append the standard Input, Transform, Output stages.
    pub fn add_default_stages(&mut self) {
        self.stages.extend(default_stages());
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, threading the record through.
    ///
    /// Each invocation is timed, including the one that fails.
    pub fn run(&mut self, record: Record) -> Result<Record, StageError> {
        let mut current = record;
        for stage in &self.stages {
            let kind = stage.kind();
            let started = Instant::now();
            let result = stage.process(current);
            let elapsed = started.elapsed();
            *self.stage_times.entry(kind).or_default() += elapsed;
            debug!(
                pipeline_id = %self.id,
                stage = stage.name(),
                stage_kind = %kind,
                elapsed_us = elapsed.as_micros() as u64,
                ok = result.is_ok(),
                "stage complete"
            );
            current = result?;
        }
        Ok(current)
    }

    /// Count the outcome of one adapter call and attribute failures.
    pub fn finish(
        &mut self,
        adapter: AdapterKind,
        result: Result<Record, AdapterError>,
    ) -> Result<Record, PipelineError> {
        match result {
            Ok(record) => {
                self.processed += 1;
                Ok(record)
            }
            Err(source) => {
                self.errors += 1;
                debug!(
                    pipeline_id = %self.id,
                    adapter = %adapter,
                    error = %source,
                    "pipeline call failed"
                );
                Err(PipelineError::Adapter {
                    adapter,
                    pipeline: self.id.clone(),
                    source,
                })
            }
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn stats(&self, adapter: AdapterKind) -> PipelineStats {
        PipelineStats {
            id: self.id.clone(),
            adapter: adapter.as_str().to_string(),
            processed: self.processed,
            errors: self.errors,
            efficiency: efficiency(self.processed, self.errors),
            stage_times: self.stage_times.clone(),
        }
    }
}

impl std::fmt::Debug for StageChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageChain")
            .field("id", &self.id)
            .field("stages", &self.stage_names())
            .field("processed", &self.processed)
            .field("errors", &self.errors)
            .finish()
    }
}
