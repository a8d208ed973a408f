use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while recording experiments.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
