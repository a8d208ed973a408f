use thiserror::Error;

use crate::llm::LLMError;
use crate::search::SearchError;

/// Errors that can occur during a pipeline run.
///
/// Provider failures are not retried or replaced with a fallback answer;
/// they end the run and surface to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Search stage failed: {0}")]
    Search(#[from] SearchError),

    #[error("Explain stage failed: {0}")]
    Llm(#[from] LLMError),

    #[error("Pipeline finished without an answer")]
    MissingAnswer,
}
