//! Processing stages.
//!
//! A stage is a stateless transformation over a [`Record`]. The standard
//! chain is:
//!
//! 1. **InputStage** - validate the raw shape, ensure `meta` exists
//! 2. **TransformStage** - enrich structured records, aggregate sequences
//! 3. **OutputStage** - format a terminal human-readable string
//!
//! Stages carry no per-record state, so one instance can be shared by any
//! number of pipelines through an [`Arc`].

mod input;
mod output;
mod transform;

use std::sync::Arc;

use nexus_model::{Record, StageError, StageKind};

pub use input::InputStage;
pub use output::OutputStage;
pub use transform::{CELSIUS_RANGE, TransformStage};

/// A single transformation step in a pipeline.
///
/// # Example
///
/// ```ignore
/// struct Uppercase;
///
/// impl Stage for Uppercase {
///     fn kind(&self) -> StageKind {
///         StageKind::Transform
///     }
///
///     fn name(&self) -> &str {
///         "uppercase"
///     }
///
///     fn process(&self, record: Record) -> Result<Record, StageError> {
///         Ok(match record {
///             Record::Text(text) => Record::Text(text.to_uppercase()),
///             other => other,
///         })
///     }
/// }
/// ```
pub trait Stage: Send + Sync {
    /// Chain position; also the key under which elapsed time accumulates.
    fn kind(&self) -> StageKind;

    /// Human-readable name for logging and stage lookup.
    fn name(&self) -> &str;

    /// Consume a record and return the next one.
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] naming this stage when the record cannot be
    /// processed.
    fn process(&self, record: Record) -> Result<Record, StageError>;
}

/// The standard Input, Transform, Output chain.
pub fn default_stages() -> Vec<Arc<dyn Stage>> {
    vec![
        Arc::new(InputStage),
        Arc::new(TransformStage),
        Arc::new(OutputStage),
    ]
}
