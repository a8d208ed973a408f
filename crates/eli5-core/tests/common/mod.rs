#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eli5_core::llm::{LLMError, LLM};
use eli5_core::search::{SearchError, SearchResult, SearchTool};

type Responder = Box<dyn Fn(&str) -> Result<String, LLMError> + Send + Sync>;

/// LLM double that answers through a closure and remembers every prompt.
pub struct ScriptedLLM {
    respond: Responder,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLLM {
    pub fn new(respond: impl Fn(&str) -> Result<String, LLMError> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(answer: &str) -> Self {
        let answer = answer.to_string();
        Self::new(move |_| Ok(answer.clone()))
    }

    pub fn failing() -> Self {
        Self::new(|_| Err(LLMError::Network("connection refused".to_string())))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }

    async fn complete_with_system(&self, _system: &str, prompt: &str) -> Result<String, LLMError> {
        self.complete(prompt).await
    }
}

/// Search double returning canned results and counting calls.
pub struct CountingSearch {
    results: Vec<SearchResult>,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingSearch {
    pub fn with_contents(contents: &[&str]) -> Self {
        Self {
            results: contents.iter().map(|c| SearchResult::from_content(*c)).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_contents(&[])
    }

    pub fn failing() -> Self {
        Self {
            results: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchTool for CountingSearch {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::ApiError {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.results.iter().take(max_results).cloned().collect())
    }
}

/// `n` words of filler text.
pub fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
