//! Web search used to ground explanations in retrieved context.
//!
//! [`SearchTool`] is the seam between the pipeline and a search provider.
//! [`TavilyClient`] is the bundled implementation.

mod error;
mod tavily;

pub use error::SearchError;
pub use tavily::TavilyClient;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Page URL.
    #[serde(default)]
    pub url: String,
    /// Extracted text relevant to the query.
    pub content: String,
    /// Provider relevance score, if reported.
    #[serde(default)]
    pub score: Option<f64>,
}

impl SearchResult {
    /// Creates a result carrying only text content.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            content: content.into(),
            score: None,
        }
    }
}

/// Trait for web search providers.
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Search the web for `query`, returning at most `max_results` hits in
    /// provider rank order.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchResult>, SearchError>;
}

#[async_trait]
impl SearchTool for Arc<dyn SearchTool> {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        (**self).search(query, max_results).await
    }
}

/// Creates a shared search client from configuration.
pub fn client_from_config(config: &SearchConfig) -> Result<Arc<dyn SearchTool>, SearchError> {
    match config.provider.as_str() {
        "tavily" => {
            let api_key = config.api_key_or_env().ok_or(SearchError::MissingApiKey)?;
            Ok(Arc::new(
                TavilyClient::new(api_key)
                    .with_base_url(config.base_url_or_default())
                    .with_search_depth(config.search_depth.clone()),
            ))
        }
        other => Err(SearchError::UnknownProvider(other.to_string())),
    }
}
