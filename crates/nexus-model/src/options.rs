//! Configuration options for pipelines and the manager.

use serde::{Deserialize, Serialize};

/// Identifier suffix that marks a pipeline as a safe backup variant.
///
/// Kept for compatibility with registries that name backups `<NAME>_BACKUP`.
/// New configuration should set [`SafeMode::Enabled`] explicitly instead.
pub const BACKUP_SUFFIX: &str = "_BACKUP";

/// Default informational throughput figure reported by the manager.
pub const DEFAULT_CAPACITY_PER_SEC: u32 = 1000;

/// Whether value-parsing failures are downgraded to status annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeMode {
    /// Enabled iff the pipeline identifier ends with [`BACKUP_SUFFIX`].
    #[default]
    FromIdentifier,
    /// Always downgrade value errors.
    Enabled,
    /// Always propagate value errors.
    Disabled,
}

impl SafeMode {
    /// Resolves the mode to a concrete flag for a pipeline identifier.
    pub fn resolve(self, pipeline_id: &str) -> bool {
        match self {
            Self::FromIdentifier => pipeline_id.ends_with(BACKUP_SUFFIX),
            Self::Enabled => true,
            Self::Disabled => false,
        }
    }
}

impl From<bool> for SafeMode {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// Options controlling the pipeline manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerOptions {
    /// Advertised streams per second. Reported only; never enforced.
    pub capacity_per_sec: u32,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            capacity_per_sec: DEFAULT_CAPACITY_PER_SEC,
        }
    }
}

impl ManagerOptions {
    #[must_use]
    pub fn with_capacity_per_sec(mut self, capacity_per_sec: u32) -> Self {
        self.capacity_per_sec = capacity_per_sec;
        self
    }
}
