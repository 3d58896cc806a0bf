use nexus_ingest::IngestError;
use nexus_model::StageError;
use thiserror::Error;

use crate::pipeline::AdapterKind;

/// Failure inside a single adapter call, before it is attributed to a pipeline.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("expects text or mapping, found {found}")]
    ExpectsTextOrMapping { found: &'static str },
    #[error("expects text, found {found}")]
    ExpectsText { found: &'static str },
    #[error("expects text or sequence, found {found}")]
    ExpectsTextOrSequence { found: &'static str },
    #[error("meta must be a mapping")]
    MetaNotMapping,
    #[error(transparent)]
    Decode(#[from] IngestError),
    #[error(transparent)]
    Stage(#[from] StageError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown pipeline: {0}")]
    UnknownPipeline(String),
    #[error("{adapter} adapter failed in pipeline '{pipeline}': {source}")]
    Adapter {
        adapter: AdapterKind,
        pipeline: String,
        #[source]
        source: AdapterError,
    },
}

impl PipelineError {
    /// The stage error at the root of an adapter failure, if any.
    pub fn stage_error(&self) -> Option<&StageError> {
        match self {
            Self::Adapter {
                source: AdapterError::Stage(err),
                ..
            } => Some(err),
            _ => None,
        }
    }

    pub fn is_unknown_pipeline(&self) -> bool {
        matches!(self, Self::UnknownPipeline(_))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
