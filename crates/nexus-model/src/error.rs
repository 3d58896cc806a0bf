use thiserror::Error;

use crate::stage::StageKind;

/// Failure raised by a single stage while processing a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("{stage} stage: missing data")]
    MissingData { stage: StageKind },
    #[error("{stage} stage: unsupported type: {found}")]
    UnsupportedType {
        stage: StageKind,
        found: &'static str,
    },
    #[error("{stage} stage: meta must be a mapping")]
    MetaNotMapping { stage: StageKind },
    #[error("{stage} stage: invalid data format")]
    InvalidDataFormat { stage: StageKind },
    #[error("{stage} stage: no numeric values to aggregate")]
    NoNumericValues { stage: StageKind },
}

impl StageError {
    /// The stage that raised this error.
    pub fn stage(&self) -> StageKind {
        match self {
            Self::MissingData { stage }
            | Self::UnsupportedType { stage, .. }
            | Self::MetaNotMapping { stage }
            | Self::InvalidDataFormat { stage }
            | Self::NoNumericValues { stage } => *stage,
        }
    }
}

pub type Result<T> = std::result::Result<T, StageError>;
