use std::path::PathBuf;
use thiserror::Error;

use crate::llm::LLMError;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The judge model failed or returned an unusable score.
    #[error("Judge failed: {0}")]
    Judge(#[from] LLMError),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Invalid dataset {}: {message}", path.display())]
    InvalidDataset { path: PathBuf, message: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EvalError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EvalError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        EvalError::InvalidDataset {
            path: path.into(),
            message: message.into(),
        }
    }
}
