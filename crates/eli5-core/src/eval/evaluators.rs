use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::DEFAULT_MAX_WORDS;
use crate::llm::{LLMError, OutputSchema, LLM};
use crate::pipeline::prompts::render;

use super::{EvalError, EvaluationRecord, Verdict};

/// Scores one evaluation record.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Key under which verdicts are reported.
    fn key(&self) -> &str;

    async fn evaluate(&self, record: &EvaluationRecord) -> Result<Verdict, EvalError>;
}

/// Passes answers of at most `max_words` whitespace-delimited tokens.
///
/// Deterministic and offline.
#[derive(Debug, Clone)]
pub struct Conciseness {
    max_words: usize,
}

impl Default for Conciseness {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

impl Conciseness {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    /// Number of whitespace-delimited tokens in `text`.
    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    pub fn is_concise(&self, text: &str) -> bool {
        Self::word_count(text) <= self.max_words
    }
}

#[async_trait]
impl Evaluator for Conciseness {
    fn key(&self) -> &str {
        "conciseness"
    }

    async fn evaluate(&self, record: &EvaluationRecord) -> Result<Verdict, EvalError> {
        let words = Self::word_count(&record.output);
        Ok(Verdict::new(self.key(), words <= self.max_words)
            .with_score(words as i64)
            .with_comment(format!("{} words (limit {})", words, self.max_words)))
    }
}

/// Rubric the judge model scores against.
pub const CORRECTNESS_PROMPT: &str = r#"You are an expert data labeler evaluating model outputs for correctness. Your task is to assign a score based on the following rubric:

<Rubric>
    A correct answer:
    - Provides accurate information
    - Uses suitable analogies and examples
    - Contains no factual errors
    - Is logically consistent

    When scoring, you should penalize:
    - Factual errors
    - Incoherent analogies and examples
    - Logical inconsistencies
</Rubric>

<Instructions>
    - Carefully read the input and output
    - Use the reference output to determine if the model output contains errors
    - Focus whether the model output uses accurate analogies and is logically consistent
</Instructions>

<Reminder>
    The analogies in the output do not need to match the reference output exactly. Focus on logical consistency.
</Reminder>

<input>
    {input}
</input>

<output>
    {output}
</output>

Use the reference outputs below to help you evaluate the correctness of the response:
<reference_outputs>
    {reference}
</reference_outputs>
"#;

/// Builds the judge prompt for one record.
pub fn build_correctness_prompt(record: &EvaluationRecord) -> String {
    render(
        CORRECTNESS_PROMPT,
        &[
            ("input", record.question.as_str()),
            ("output", record.output.as_str()),
            ("reference", record.reference.as_str()),
        ],
    )
}

/// Structured judgment returned by the judge model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CorrectnessScore {
    /// 1 for correct, 0 for incorrect.
    pub score: i64,
}

impl CorrectnessScore {
    /// Schema requested from the judge model.
    pub fn schema() -> OutputSchema {
        OutputSchema::new(
            "correctness_score",
            "Correctness score of the answer when compared to the reference answer.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "score": {
                        "type": "integer",
                        "description": "The score of the correctness of the answer, from 0 to 1",
                        "enum": [0, 1]
                    }
                },
                "required": ["score"],
                "additionalProperties": false
            }),
        )
    }
}

/// LLM-as-a-judge correctness check against the reference answer.
///
/// Passes only when the judge returns a score of exactly 1. Results are
/// as reliable as the judge; nothing is cached or retried.
pub struct Correctness {
    judge: Arc<dyn LLM>,
}

impl Correctness {
    pub fn new(judge: Arc<dyn LLM>) -> Self {
        Self { judge }
    }
}

#[async_trait]
impl Evaluator for Correctness {
    fn key(&self) -> &str {
        "correctness"
    }

    async fn evaluate(&self, record: &EvaluationRecord) -> Result<Verdict, EvalError> {
        let prompt = build_correctness_prompt(record);
        let schema = CorrectnessScore::schema();

        let value = self.judge.complete_structured(&prompt, &schema).await?;
        let judgment: CorrectnessScore =
            serde_json::from_value(value).map_err(|e| LLMError::SchemaMismatch {
                schema: schema.name.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(score = judgment.score, "Judge scored answer");
        Ok(Verdict::new(self.key(), judgment.score == 1).with_score(judgment.score))
    }
}
