//! Pipeline engine: stage composition, format adapters, and the manager.
//!
//! A [`Pipeline`] converts one external encoding into a canonical
//! [`Record`](nexus_model::Record) and runs it through an ordered
//! [`StageChain`]. The [`PipelineManager`] routes calls by identifier, fails
//! over to a registered backup when a primary pipeline fails, and chains
//! several pipelines while deferring output formatting to the last hop.

pub mod adapters;
pub mod chain;
pub mod config;
pub mod error;
pub mod manager;
pub mod pipeline;
pub mod stages;

pub use adapters::{CsvAdapter, JsonAdapter, StreamAdapter};
pub use chain::StageChain;
pub use config::{ConfigError, NexusConfig, PipelineSpec};
pub use error::{AdapterError, PipelineError, Result};
pub use manager::PipelineManager;
pub use pipeline::{AdapterKind, Pipeline};
pub use stages::{InputStage, OutputStage, Stage, TransformStage, default_stages};
