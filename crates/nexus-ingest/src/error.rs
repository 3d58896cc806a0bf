use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("json document must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
