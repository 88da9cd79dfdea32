use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A data file could not be read at all.
    #[error("failed to load {}: {source}", path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pasted JSON, a data file body, or delimited text was malformed.
    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
