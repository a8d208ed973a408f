pub mod config;
pub mod eval;
pub mod llm;
pub mod pipeline;
pub mod search;
pub mod storage;

pub use config::{Config, ConfigError, LLMConfig, SearchConfig, StorageConfig};
pub use eval::{Conciseness, Correctness, Dataset, EvaluationHarness, Experiment};
pub use llm::{ClaudeClient, LLMError, OpenAIClient, LLM};
pub use pipeline::{Document, GraphState, Pipeline, PipelineError, RunOutput, Variant};
pub use search::{SearchError, SearchTool, TavilyClient};
pub use storage::{ExperimentStore, FileExperimentStore, StorageError};
