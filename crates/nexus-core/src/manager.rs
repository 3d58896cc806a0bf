//! Identifier-keyed pipeline registry with backup failover and chaining.

use std::collections::BTreeMap;

use nexus_model::{ManagerOptions, PipelineStats, Record};
use tracing::{debug, info_span, warn};

use crate::error::{PipelineError, Result};
use crate::pipeline::Pipeline;
use crate::stages::OutputStage;

/// Routes calls to registered pipelines.
///
/// Primaries and backups live in separate maps. A backup is only consulted
/// after its primary fails inside `process`; an unknown identifier fails
/// immediately without any backup lookup.
#[derive(Default)]
pub struct PipelineManager {
    options: ManagerOptions,
    pipelines: BTreeMap<String, Box<dyn Pipeline>>,
    backups: BTreeMap<String, Box<dyn Pipeline>>,
}

impl PipelineManager {
    pub fn new(options: ManagerOptions) -> Self {
        Self {
            options,
            pipelines: BTreeMap::new(),
            backups: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Register a primary under its own identifier, returning any pipeline it
    /// replaced.
    pub fn register(&mut self, pipeline: Box<dyn Pipeline>) -> Option<Box<dyn Pipeline>> {
        let id = pipeline.id().to_string();
        debug!(pipeline_id = %id, adapter = %pipeline.adapter(), "registered pipeline");
        self.pipelines.insert(id, pipeline)
    }

    /// Associate a backup with `primary_id`. The primary need not exist yet.
    pub fn register_backup(
        &mut self,
        primary_id: impl Into<String>,
        backup: Box<dyn Pipeline>,
    ) -> Option<Box<dyn Pipeline>> {
        let primary_id = primary_id.into();
        debug!(
            pipeline_id = %primary_id,
            backup_id = backup.id(),
            "registered backup pipeline"
        );
        self.backups.insert(primary_id, backup)
    }

    /// Run one pipeline, failing over to its backup when the primary fails.
    ///
    /// The backup receives the original raw input.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownPipeline`] for an unregistered `id`,
    /// the primary's failure when no backup exists, or the backup's own
    /// failure.
    pub fn execute(&mut self, id: &str, raw: Record) -> Result<Record> {
        let _span = info_span!("execute", pipeline_id = %id).entered();
        let primary = self
            .pipelines
            .get_mut(id)
            .ok_or_else(|| PipelineError::UnknownPipeline(id.to_string()))?;

        let Some(backup) = self.backups.get_mut(id) else {
            return primary.process(raw);
        };

        match primary.process(raw.clone()) {
            Ok(record) => Ok(record),
            Err(error) => {
                warn!(
                    backup_id = backup.id(),
                    %error,
                    "recovery initiated: switching to backup processor"
                );
                backup.process(raw)
            }
        }
    }

    /// Run `ids` in order, feeding each result into the next pipeline.
    ///
    /// Intermediate output formatting is deferred by marking structured
    /// records with `meta.chaining`; the marker is removed after the last hop
    /// and one final output pass always runs.
    ///
    /// # Errors
    ///
    /// Returns the first hop failure that survives backup failover.
    pub fn chain<S: AsRef<str>>(&mut self, ids: &[S], raw: Record) -> Result<Record> {
        let _span = info_span!("chain", hops = ids.len()).entered();
        let mut current = raw;
        for id in ids {
            current.mark_chaining();
            current = self.execute(id.as_ref(), current)?;
        }
        current.clear_chaining();
        Ok(OutputStage.format(current))
    }

    pub fn stats(&self, id: &str) -> Option<PipelineStats> {
        self.pipelines.get(id).map(|pipeline| pipeline.stats())
    }

    /// Stats of the backup registered for `primary_id`.
    pub fn backup_stats(&self, primary_id: &str) -> Option<PipelineStats> {
        self.backups.get(primary_id).map(|backup| backup.stats())
    }

    /// Stats for every primary followed by every backup.
    pub fn all_stats(&self) -> Vec<PipelineStats> {
        self.pipelines
            .values()
            .chain(self.backups.values())
            .map(|pipeline| pipeline.stats())
            .collect()
    }

    /// Registered primary identifiers, sorted.
    pub fn pipeline_ids(&self) -> Vec<&str> {
        self.pipelines.keys().map(String::as_str).collect()
    }

    pub fn pipeline(&self, id: &str) -> Option<&dyn Pipeline> {
        self.pipelines.get(id).map(|pipeline| &**pipeline)
    }

    /// Identifier of the backup registered for `primary_id`.
    pub fn backup_id(&self, primary_id: &str) -> Option<&str> {
        self.backups.get(primary_id).map(|backup| backup.id())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pipelines.contains_key(id)
    }

    pub fn has_backup(&self, primary_id: &str) -> bool {
        self.backups.contains_key(primary_id)
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl std::fmt::Debug for PipelineManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineManager")
            .field("options", &self.options)
            .field("pipelines", &self.pipeline_ids())
            .field("backups", &self.backups.keys().collect::<Vec<_>>())
            .finish()
    }
}
