//! The search → explain pipeline.
//!
//! A [`Pipeline`] runs two stages in a fixed order over a [`GraphState`]
//! built fresh for each question:
//!
//! 1. [`SearchStage`] appends one [`Document`] of web search context.
//! 2. [`ExplainStage`] formats a prompt from the question and context and
//!    appends the model's answer as one [`Message`].
//!
//! The three [`Variant`]s share this shape and differ only in the search
//! policy and prompt style wired into the stages.
//!
//! # Example
//!
//! ```ignore
//! use eli5_core::{Config, Pipeline};
//!
//! let config = Config::load()?;
//! let pipeline = Pipeline::from_config(&config)?;
//! let output = pipeline.ask("Why is the sky blue?").await?;
//! println!("{}", output.output);
//! ```

mod error;
mod explain_stage;
pub mod prompts;
mod search_stage;
mod stage;
mod state;
mod variant;

pub use error::PipelineError;
pub use explain_stage::ExplainStage;
pub use search_stage::{SearchPolicy, SearchStage};
pub use stage::Stage;
pub use state::{Document, GraphState, InputState, Message, Role, RunOutput};
pub use variant::{ContextPolicy, Persona, PromptStyle, UnknownVariant, Variant};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{
    Config, DEFAULT_FLAKY_MARKER, DEFAULT_NO_RESULTS_TEXT, DEFAULT_SEARCH_MAX_RESULTS,
};
use crate::llm::{LLMError, Provider, LLM};
use crate::search::{self, SearchError, SearchTool};

/// Something that turns `{question}` into `{output}`.
///
/// The evaluation harness drives any target; [`Pipeline`] is the usual one.
#[async_trait]
pub trait Target: Send + Sync {
    async fn run(&self, input: &InputState) -> Result<RunOutput, PipelineError>;
}

/// Tunables shared by every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Number of search results folded into the context document.
    pub max_results: usize,
    /// Substring that triggers the flaky search substitution.
    pub flaky_marker: String,
    /// Content of the substituted document.
    pub no_results_text: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_SEARCH_MAX_RESULTS,
            flaky_marker: DEFAULT_FLAKY_MARKER.to_string(),
            no_results_text: DEFAULT_NO_RESULTS_TEXT.to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_results: config.search.max_results,
            flaky_marker: config.pipeline.flaky_marker.clone(),
            no_results_text: config.pipeline.no_results_text.clone(),
        }
    }
}

/// Errors that can occur while wiring a pipeline from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Variant(#[from] UnknownVariant),

    #[error("LLM setup failed: {0}")]
    Llm(#[from] LLMError),

    #[error("Search setup failed: {0}")]
    Search(#[from] SearchError),
}

/// A compiled search → explain pipeline.
pub struct Pipeline {
    variant: Variant,
    search: SearchStage,
    explain: ExplainStage,
}

impl Pipeline {
    /// Wires a pipeline for `variant` around the given service handles.
    pub fn new(
        variant: Variant,
        llm: Arc<dyn LLM>,
        search_tool: Arc<dyn SearchTool>,
        settings: PipelineSettings,
    ) -> Self {
        let policy = if variant.has_flaky_search() {
            SearchPolicy::Flaky {
                marker: settings.flaky_marker,
                placeholder: settings.no_results_text,
            }
        } else {
            SearchPolicy::Always
        };

        Self {
            variant,
            search: SearchStage::new(search_tool, policy, settings.max_results),
            explain: ExplainStage::new(llm, variant.prompt_style()),
        }
    }

    /// Builds the configured variant with clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let variant: Variant = config.pipeline.variant.parse()?;
        Self::from_config_with_variant(config, variant)
    }

    /// Builds `variant` with clients from configuration.
    pub fn from_config_with_variant(config: &Config, variant: Variant) -> Result<Self, SetupError> {
        let llm = Provider::client_from_config(&config.llm)?;
        let search_tool = search::client_from_config(&config.search)?;
        Ok(Self::new(
            variant,
            llm,
            search_tool,
            PipelineSettings::from_config(config),
        ))
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Runs every stage over `state`, start to end.
    ///
    /// The state is taken by value, so separate invocations never share
    /// document or message lists.
    pub async fn invoke(&self, mut state: GraphState) -> Result<GraphState, PipelineError> {
        let mut stage = Some(Stage::first());

        while let Some(current) = stage {
            tracing::debug!(stage = current.display_name(), variant = %self.variant, "Entering stage");
            match current {
                Stage::Search => self.search.run(&mut state).await?,
                Stage::Explain => self.explain.run(&mut state).await?,
            }
            stage = current.next();
        }

        Ok(state)
    }

    /// Runs the pipeline for one input and extracts the answer.
    pub async fn run(&self, input: &InputState) -> Result<RunOutput, PipelineError> {
        tracing::info!(variant = %self.variant, question = %input.question, "Running pipeline");

        let state = self.invoke(GraphState::new(input.question.clone())).await?;
        let output = state
            .answer()
            .map(str::to_string)
            .ok_or(PipelineError::MissingAnswer)?;

        Ok(RunOutput {
            output,
            documents: state.documents,
        })
    }

    /// Convenience wrapper over [`Pipeline::run`].
    pub async fn ask(&self, question: &str) -> Result<RunOutput, PipelineError> {
        self.run(&InputState::new(question)).await
    }
}

#[async_trait]
impl Target for Pipeline {
    async fn run(&self, input: &InputState) -> Result<RunOutput, PipelineError> {
        Pipeline::run(self, input).await
    }
}
