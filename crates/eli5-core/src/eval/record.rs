use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One example prepared for scoring: the input question, the reference
/// answer and what the pipeline produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question: String,
    pub reference: String,
    pub output: String,
}

/// The outcome of one evaluator on one example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Evaluator key, e.g. "conciseness".
    pub key: String,
    pub passed: bool,
    /// Raw score, when the evaluator produces one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Verdict {
    pub fn new(key: impl Into<String>, passed: bool) -> Self {
        Self {
            key: key.into(),
            passed,
            score: None,
            comment: None,
        }
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Everything recorded for one dataset example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleResult {
    pub example_id: String,
    pub question: String,
    pub reference: String,
    /// Pipeline answer; absent when the run failed.
    pub output: Option<String>,
    pub verdicts: Vec<Verdict>,
    /// Run failure or evaluator failures, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ExampleResult {
    /// True if the pipeline run itself failed and the example was lost.
    pub fn is_lost(&self) -> bool {
        self.output.is_none()
    }

    /// Looks up the verdict for an evaluator key.
    pub fn verdict(&self, key: &str) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| v.key == key)
    }
}

/// A named run of a target over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    /// `<prefix>-<short id>`.
    pub name: String,
    pub prefix: String,
    pub dataset: String,
    /// Label of the target that was evaluated, e.g. the variant name.
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub results: Vec<ExampleResult>,
}

impl Experiment {
    /// Starts a new experiment record.
    pub fn new(
        prefix: impl Into<String>,
        dataset: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        let prefix = prefix.into();
        let name = format!("{}-{}", prefix, &id[..8]);

        Self {
            id,
            name,
            prefix,
            dataset: dataset.into(),
            target: target.into(),
            started_at: Utc::now(),
            finished_at: None,
            results: Vec::new(),
        }
    }

    /// Passing and scored verdict counts per evaluator key.
    ///
    /// Display helper only; no statistics beyond a tally.
    pub fn pass_counts(&self) -> BTreeMap<String, (usize, usize)> {
        let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for verdict in self.results.iter().flat_map(|r| r.verdicts.iter()) {
            let entry = counts.entry(verdict.key.clone()).or_default();
            if verdict.passed {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
        counts
    }

    /// Number of examples whose run failed.
    pub fn lost_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_lost()).count()
    }
}
