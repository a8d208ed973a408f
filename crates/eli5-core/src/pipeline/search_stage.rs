use std::sync::Arc;

use crate::search::SearchTool;

use super::{Document, GraphState, PipelineError};

/// How the search stage decides whether to call the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPolicy {
    /// Always query the provider.
    Always,
    /// Skip the provider and substitute `placeholder` whenever the question
    /// contains `marker`. Used to simulate search failure deterministically.
    Flaky { marker: String, placeholder: String },
}

/// Appends one document of web search context to the state.
pub struct SearchStage {
    tool: Arc<dyn SearchTool>,
    policy: SearchPolicy,
    max_results: usize,
}

impl SearchStage {
    pub fn new(tool: Arc<dyn SearchTool>, policy: SearchPolicy, max_results: usize) -> Self {
        Self {
            tool,
            policy,
            max_results,
        }
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Runs the stage, appending exactly one document.
    ///
    /// An empty result list yields an empty document; provider errors are
    /// returned unchanged.
    pub async fn run(&self, state: &mut GraphState) -> Result<(), PipelineError> {
        if let SearchPolicy::Flaky {
            marker,
            placeholder,
        } = &self.policy
        {
            if state.question.contains(marker.as_str()) {
                tracing::debug!(marker = %marker, "Question matches flaky marker, skipping search");
                state.documents.push(Document::new(placeholder.clone()));
                return Ok(());
            }
        }

        let results = self.tool.search(&state.question, self.max_results).await?;

        if results.is_empty() {
            tracing::warn!(question = %state.question, "Web search returned no results");
        }

        let content = results
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::debug!(
            results = results.len(),
            chars = content.len(),
            "Search stage appended context"
        );
        state.documents.push(Document::new(content));
        Ok(())
    }
}
