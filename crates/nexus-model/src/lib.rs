//! Data model for the nexus pipeline engine.
//!
//! Every stage and adapter exchanges a [`Record`]. The record's shape is
//! classified once into a [`RecordKind`] so downstream code can dispatch
//! with an exhaustive `match` instead of probing keys repeatedly.

pub mod error;
pub mod numeric;
pub mod options;
pub mod record;
pub mod stage;
pub mod stats;

pub use error::{Result, StageError};
pub use numeric::{format_numeric, numeric_value, parse_f64};
pub use options::{BACKUP_SUFFIX, DEFAULT_CAPACITY_PER_SEC, ManagerOptions, SafeMode};
pub use record::{Record, RecordKind, keys};
pub use stage::StageKind;
pub use stats::{PipelineStats, efficiency};
