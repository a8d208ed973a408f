mod claude;
mod error;
mod openai;
mod provider;

pub use claude::ClaudeClient;
pub use error::LLMError;
pub use openai::OpenAIClient;
pub use provider::Provider;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Target shape for a structured completion.
///
/// `schema` is a JSON Schema object describing the expected response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Short identifier, used as the schema name by providers that need one.
    pub name: String,
    /// What the structured value represents.
    pub description: String,
    /// JSON Schema of the expected object.
    pub schema: serde_json::Value,
}

impl OutputSchema {
    /// Creates a new output schema.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }

    /// Instruction appended to prompts for providers without native
    /// structured output.
    pub fn instruction(&self) -> String {
        format!(
            "Respond only with a JSON object ({}) matching this JSON Schema, no additional text:\n{}",
            self.description, self.schema
        )
    }
}

/// Trait for Large Language Model providers.
///
/// This abstraction allows swapping between different LLM providers
/// without changing the rest of the code.
///
/// # Supported Providers
///
/// - **OpenAI-compatible** (default): Works with OpenAI, Azure, Ollama, vLLM, OpenRouter, etc.
/// - **Anthropic**: Claude models via Anthropic API
/// - **Ollama**: Local models via Ollama
///
/// # Example
///
/// ```ignore
/// use eli5_core::llm::{Provider, LLM};
/// use eli5_core::Config;
///
/// let config = Config::load()?;
/// let llm = Provider::client_from_config(&config.llm)?;
///
/// let response = llm.complete("Why is the sky blue?").await?;
/// ```
#[async_trait]
pub trait LLM: Send + Sync {
    /// Complete a prompt and return the response.
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;

    /// Complete a prompt with a system message.
    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError>;

    /// Complete a prompt and parse the response as a JSON value matching `schema`.
    ///
    /// Default implementation asks for JSON in the prompt and parses the
    /// reply, tolerating a surrounding Markdown code block.
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LLMError> {
        let prompt = format!("{}\n\n{}", prompt, schema.instruction());
        let response = self.complete(&prompt).await?;
        parse_json_response(&response)
    }
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl LLM for Box<dyn LLM> {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        (**self).complete(prompt).await
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LLMError> {
        (**self).complete_structured(prompt, schema).await
    }
}

/// Blanket implementation for shared trait objects.
#[async_trait]
impl LLM for Arc<dyn LLM> {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        (**self).complete(prompt).await
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LLMError> {
        (**self).complete_structured(prompt, schema).await
    }
}

/// Parses a model reply as JSON.
pub(crate) fn parse_json_response(response: &str) -> Result<serde_json::Value, LLMError> {
    let json_str = extract_json(response);
    serde_json::from_str(json_str).map_err(|e| {
        LLMError::ParseError(format!(
            "expected JSON: {}. Response: {}",
            e,
            json_str.chars().take(500).collect::<String>()
        ))
    })
}

/// Extracts JSON from a response that might be wrapped in markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Check for ```json ... ``` or ``` ... ```
    if trimmed.starts_with("```") {
        if let Some(start) = trimmed.find('\n') {
            let rest = &trimmed[start + 1..];
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
        }
    }

    trimmed
}
