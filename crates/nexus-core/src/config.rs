//! TOML-described pipeline registries.
//!
//! ```toml
//! capacity_per_sec = 1000
//!
//! [[pipeline]]
//! id = "JSON_PIPE"
//! adapter = "json"
//!
//! [[pipeline]]
//! id = "JSON_BACKUP"
//! adapter = "json"
//! backup_for = "JSON_PIPE"
//! safe_mode = "enabled"
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nexus_model::{DEFAULT_CAPACITY_PER_SEC, ManagerOptions, SafeMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::adapters::{CsvAdapter, JsonAdapter, StreamAdapter};
use crate::manager::PipelineManager;
use crate::pipeline::{AdapterKind, Pipeline};
use crate::stages::{Stage, default_stages};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML registry: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("pipeline entry has an empty id")]
    EmptyId,
    #[error("duplicate pipeline id: {id}")]
    DuplicateId { id: String },
    #[error("pipeline {id}: safe_mode is only supported by the JSON adapter, not {adapter}")]
    SafeModeUnsupported { id: String, adapter: AdapterKind },
}

/// A pipeline registry: manager options plus one entry per pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NexusConfig {
    #[serde(default = "default_capacity")]
    pub capacity_per_sec: u32,
    #[serde(default, rename = "pipeline")]
    pub pipelines: Vec<PipelineSpec>,
}

/// One registry entry. Entries with `backup_for` become backups of that
/// primary instead of primaries themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub id: String,
    pub adapter: AdapterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_mode: Option<SafeMode>,
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY_PER_SEC
}

impl PipelineSpec {
    pub fn new(id: impl Into<String>, adapter: AdapterKind) -> Self {
        Self {
            id: id.into(),
            adapter,
            backup_for: None,
            safe_mode: None,
        }
    }

    #[must_use]
    pub fn backup_for(mut self, primary_id: impl Into<String>) -> Self {
        self.backup_for = Some(primary_id.into());
        self
    }

    #[must_use]
    pub fn with_safe_mode(mut self, mode: SafeMode) -> Self {
        self.safe_mode = Some(mode);
        self
    }

    fn build(&self, stages: &[Arc<dyn Stage>]) -> Box<dyn Pipeline> {
        let mut pipeline: Box<dyn Pipeline> = match self.adapter {
            AdapterKind::Json => Box::new(
                JsonAdapter::new(&self.id).with_safe_mode(self.safe_mode.unwrap_or_default()),
            ),
            AdapterKind::Csv => Box::new(CsvAdapter::new(&self.id)),
            AdapterKind::Stream => Box::new(StreamAdapter::new(&self.id)),
        };
        for stage in stages {
            pipeline.add_stage(Arc::clone(stage));
        }
        pipeline
    }
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self::demo()
    }
}

impl NexusConfig {
    /// The built-in registry used by the demo walkthrough.
    pub fn demo() -> Self {
        Self {
            capacity_per_sec: DEFAULT_CAPACITY_PER_SEC,
            pipelines: vec![
                PipelineSpec::new("JSON_PIPE", AdapterKind::Json),
                PipelineSpec::new("CSV_PIPE", AdapterKind::Csv),
                PipelineSpec::new("STREAM_PIPE", AdapterKind::Stream),
                PipelineSpec::new("JSON_BACKUP", AdapterKind::Json).backup_for("JSON_PIPE"),
            ],
        }
    }

    /// Parse a registry from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown adapters.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a registry file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, or
    /// [`ConfigError::Parse`] when it is not a valid registry.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), pipelines = config.pipelines.len(), "loaded registry");
        Ok(config)
    }

    pub fn options(&self) -> ManagerOptions {
        ManagerOptions::default().with_capacity_per_sec(self.capacity_per_sec)
    }

    /// Check ids are present and unique, and that safe mode is only set on
    /// JSON pipelines.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in entry order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for spec in &self.pipelines {
            if spec.id.trim().is_empty() {
                return Err(ConfigError::EmptyId);
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    id: spec.id.clone(),
                });
            }
            if spec.safe_mode.is_some() && spec.adapter != AdapterKind::Json {
                return Err(ConfigError::SafeModeUnsupported {
                    id: spec.id.clone(),
                    adapter: spec.adapter,
                });
            }
        }
        Ok(())
    }

    /// Validate the registry and register every entry with one shared
    /// Input, Transform, Output stage set.
    ///
    /// # Errors
    ///
    /// Returns any [`validate`](Self::validate) failure.
    pub fn build_manager(&self) -> Result<PipelineManager, ConfigError> {
        self.validate()?;
        let stages = default_stages();
        let mut manager = PipelineManager::new(self.options());

        for spec in self.pipelines.iter().filter(|spec| spec.backup_for.is_none()) {
            manager.register(spec.build(&stages));
        }
        for spec in &self.pipelines {
            let Some(primary_id) = &spec.backup_for else {
                continue;
            };
            if !manager.contains(primary_id) {
                warn!(
                    backup_id = %spec.id,
                    primary_id = %primary_id,
                    "backup registered for an unknown primary"
                );
            }
            manager.register_backup(primary_id.clone(), spec.build(&stages));
        }
        Ok(manager)
    }
}
