use std::sync::Arc;

use crate::llm::LLM;

use super::prompts::build_explain_prompt;
use super::{GraphState, Message, PipelineError, PromptStyle};

/// Generates the answer and appends it to the state's messages.
pub struct ExplainStage {
    llm: Arc<dyn LLM>,
    style: PromptStyle,
}

impl ExplainStage {
    pub fn new(llm: Arc<dyn LLM>, style: PromptStyle) -> Self {
        Self { llm, style }
    }

    pub fn style(&self) -> PromptStyle {
        self.style
    }

    /// Runs the stage, appending exactly one assistant message.
    ///
    /// The model response is used as-is.
    pub async fn run(&self, state: &mut GraphState) -> Result<(), PipelineError> {
        let prompt = build_explain_prompt(self.style, &state.question, &state.context());
        let answer = self.llm.complete(&prompt).await?;

        tracing::debug!(words = answer.split_whitespace().count(), "Explain stage generated answer");
        state.messages.push(Message::assistant(answer));
        Ok(())
    }
}
