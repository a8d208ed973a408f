use serde::{Deserialize, Serialize};

/// A unit of retrieved text passed from the search stage to the explain stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Text content of the document.
    pub page_content: String,
}

impl Document {
    /// Creates a document holding `page_content`.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
        }
    }

    /// Returns true if the document carries no usable text.
    pub fn is_empty(&self) -> bool {
        self.page_content.trim().is_empty()
    }
}

/// Author of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

/// A message in the pipeline state. The explain stage appends the
/// generated answer as an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a human message.
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }
}

/// Caller-facing input: `{"question": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub question: String,
}

impl InputState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// State threaded through one pipeline run.
///
/// `documents` is appended to by the search stage and `messages` by the
/// explain stage; neither ever shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphState {
    pub question: String,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl GraphState {
    /// Creates a fresh state for `question`.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            documents: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Text of every document joined with newlines.
    pub fn context(&self) -> String {
        self.documents
            .iter()
            .map(|d| d.page_content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Content of the most recent assistant message.
    pub fn answer(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

impl From<InputState> for GraphState {
    fn from(input: InputState) -> Self {
        GraphState::new(input.question)
    }
}

/// Caller-facing output: `{"output": ...}` plus the retrieved documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    pub output: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
}
