use std::sync::Arc;

use chrono::Utc;

use crate::pipeline::{InputState, Target};

use super::{Dataset, EvaluationRecord, Evaluator, ExampleResult, Experiment};

/// Progress callback: `(finished, total)`.
pub type ProgressFn = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Runs a target over a dataset and scores every answer.
///
/// Examples are processed one at a time. A failed run is recorded as a
/// lost example and the harness moves on; an evaluator failure is recorded
/// against that example and the remaining evaluators still run.
pub struct EvaluationHarness {
    target: Arc<dyn Target>,
    target_label: String,
    evaluators: Vec<Box<dyn Evaluator>>,
    progress: Option<ProgressFn>,
}

impl EvaluationHarness {
    /// Creates a harness for `target`. `target_label` names the target in
    /// experiment records, e.g. the pipeline variant.
    pub fn new(target: Arc<dyn Target>, target_label: impl Into<String>) -> Self {
        Self {
            target,
            target_label: target_label.into(),
            evaluators: Vec::new(),
            progress: None,
        }
    }

    /// Adds an evaluator.
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluators.push(Box::new(evaluator));
        self
    }

    /// Sets a progress callback invoked after each example.
    pub fn with_progress(mut self, progress: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Keys of the registered evaluators, in order.
    pub fn evaluator_keys(&self) -> Vec<&str> {
        self.evaluators.iter().map(|e| e.key()).collect()
    }

    /// Evaluates every example in `dataset` under a new experiment.
    pub async fn evaluate(&self, dataset: &Dataset, experiment_prefix: &str) -> Experiment {
        let mut experiment = Experiment::new(experiment_prefix, &dataset.name, &self.target_label);
        let total = dataset.len();

        tracing::info!(
            experiment = %experiment.name,
            dataset = %dataset.name,
            examples = total,
            "Starting experiment"
        );

        for (done, example) in dataset.examples.iter().enumerate() {
            let mut result = ExampleResult {
                example_id: example.id.clone(),
                question: example.question().to_string(),
                reference: example.reference().to_string(),
                output: None,
                verdicts: Vec::new(),
                errors: Vec::new(),
            };

            match self
                .target
                .run(&InputState::new(example.question()))
                .await
            {
                Ok(run) => {
                    let record = EvaluationRecord {
                        question: result.question.clone(),
                        reference: result.reference.clone(),
                        output: run.output,
                    };
                    self.score(&record, &mut result).await;
                    result.output = Some(record.output);
                }
                Err(e) => {
                    tracing::warn!(example = %example.id, error = %e, "Run failed, example lost");
                    result.errors.push(e.to_string());
                }
            }

            experiment.results.push(result);

            if let Some(progress) = &self.progress {
                progress(done + 1, total);
            }
        }

        experiment.finished_at = Some(Utc::now());
        tracing::info!(
            experiment = %experiment.name,
            lost = experiment.lost_count(),
            "Experiment finished"
        );
        experiment
    }

    async fn score(&self, record: &EvaluationRecord, result: &mut ExampleResult) {
        for evaluator in &self.evaluators {
            match evaluator.evaluate(record).await {
                Ok(verdict) => result.verdicts.push(verdict),
                Err(e) => {
                    tracing::warn!(
                        example = %result.example_id,
                        evaluator = evaluator.key(),
                        error = %e,
                        "Evaluator failed"
                    );
                    result.errors.push(format!("{}: {}", evaluator.key(), e));
                }
            }
        }
    }
}
