mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{words, CountingSearch, ScriptedLLM};
use eli5_core::eval::{
    Conciseness, Correctness, Dataset, EvalError, EvaluationHarness, EvaluationRecord, Evaluator,
    Example,
};
use eli5_core::pipeline::{
    InputState, Pipeline, PipelineError, PipelineSettings, RunOutput, Target, Variant,
};
use eli5_core::search::SearchError;

fn inflation_record(output: &str) -> EvaluationRecord {
    EvaluationRecord {
        question: "What is inflation?".to_string(),
        reference: "Inflation is when prices go up over time, so money buys less.".to_string(),
        output: output.to_string(),
    }
}

/// Target that echoes the question and fails when it contains "fail".
struct EchoTarget {
    runs: AtomicUsize,
}

impl EchoTarget {
    fn new() -> Self {
        Self {
            runs: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Target for EchoTarget {
    async fn run(&self, input: &InputState) -> Result<RunOutput, PipelineError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if input.question.contains("fail") {
            return Err(PipelineError::Search(SearchError::RateLimited));
        }
        Ok(RunOutput {
            output: format!("Simple answer to {}", input.question),
            documents: Vec::new(),
        })
    }
}

fn dataset() -> Dataset {
    Dataset::new(
        "eli5-golden",
        vec![
            Example::new("1", "What is inflation?", "Prices go up."),
            Example::new("2", "Please fail here", "Unused."),
            Example::new("3", "Why is the sky blue?", "Light scatters."),
        ],
    )
}

#[tokio::test]
async fn test_conciseness_limit_is_inclusive() {
    let evaluator = Conciseness::default();

    let verdict = evaluator
        .evaluate(&inflation_record(&words(200)))
        .await
        .unwrap();
    assert!(verdict.passed);

    let verdict = evaluator
        .evaluate(&inflation_record(&words(201)))
        .await
        .unwrap();
    assert!(!verdict.passed);
}

#[tokio::test]
async fn test_conciseness_ignores_whitespace_runs() {
    let evaluator = Conciseness::new(3);
    let verdict = evaluator
        .evaluate(&inflation_record("  prices \n\n go   up  "))
        .await
        .unwrap();
    assert!(verdict.passed);
    assert_eq!(verdict.score, Some(3));
}

#[tokio::test]
async fn test_correctness_passes_on_score_one() {
    let judge = Arc::new(ScriptedLLM::fixed(r#"{"score": 1}"#));
    let evaluator = Correctness::new(judge.clone());

    let verdict = evaluator
        .evaluate(&inflation_record(
            "When things in the shop cost more than last year, that is inflation.",
        ))
        .await
        .unwrap();

    assert_eq!(verdict.key, "correctness");
    assert!(verdict.passed);
    assert_eq!(verdict.score, Some(1));

    let prompt = &judge.prompts()[0];
    assert!(prompt.contains("What is inflation?"));
    assert!(prompt.contains("When things in the shop cost more than last year"));
    assert!(prompt.contains("so money buys less"));
}

#[tokio::test]
async fn test_correctness_fails_on_score_zero() {
    let judge = Arc::new(ScriptedLLM::fixed("```json\n{\"score\": 0}\n```"));
    let evaluator = Correctness::new(judge);

    let verdict = evaluator
        .evaluate(&inflation_record("Inflation is when balloons get bigger."))
        .await
        .unwrap();

    assert!(!verdict.passed);
    assert_eq!(verdict.score, Some(0));
}

#[tokio::test]
async fn test_correctness_rejects_unusable_judgment() {
    let evaluator = Correctness::new(Arc::new(ScriptedLLM::fixed("I think it is fine.")));
    let result = evaluator.evaluate(&inflation_record("answer")).await;
    assert!(matches!(result, Err(EvalError::Judge(_))));

    let evaluator = Correctness::new(Arc::new(ScriptedLLM::fixed(r#"{"verdict": "yes"}"#)));
    let result = evaluator.evaluate(&inflation_record("answer")).await;
    assert!(matches!(result, Err(EvalError::Judge(_))));
}

#[tokio::test]
async fn test_correctness_surfaces_judge_outage() {
    let evaluator = Correctness::new(Arc::new(ScriptedLLM::failing()));
    let result = evaluator.evaluate(&inflation_record("answer")).await;
    assert!(matches!(result, Err(EvalError::Judge(_))));
}

#[tokio::test]
async fn test_harness_records_lost_examples_and_continues() {
    let target = Arc::new(EchoTarget::new());
    let progress = Arc::new(Mutex::new(Vec::new()));
    let seen = progress.clone();

    let harness = EvaluationHarness::new(target.clone(), "echo")
        .with_evaluator(Conciseness::default())
        .with_evaluator(Correctness::new(Arc::new(ScriptedLLM::fixed(
            r#"{"score": 1}"#,
        ))))
        .with_progress(move |done, total| seen.lock().unwrap().push((done, total)));

    assert_eq!(harness.evaluator_keys(), vec!["conciseness", "correctness"]);

    let experiment = harness.evaluate(&dataset(), "eli5-test").await;

    assert_eq!(target.runs.load(Ordering::SeqCst), 3);
    assert_eq!(experiment.results.len(), 3);
    assert_eq!(experiment.dataset, "eli5-golden");
    assert_eq!(experiment.target, "echo");
    assert!(experiment.name.starts_with("eli5-test-"));
    assert!(experiment.finished_at.is_some());
    assert_eq!(experiment.lost_count(), 1);

    let lost = &experiment.results[1];
    assert!(lost.is_lost());
    assert!(lost.verdicts.is_empty());
    assert_eq!(lost.errors.len(), 1);

    let scored = &experiment.results[2];
    assert_eq!(
        scored.output.as_deref(),
        Some("Simple answer to Why is the sky blue?")
    );
    assert!(scored.verdict("conciseness").unwrap().passed);
    assert!(scored.verdict("correctness").unwrap().passed);

    let counts = experiment.pass_counts();
    assert_eq!(counts["conciseness"], (2, 2));
    assert_eq!(counts["correctness"], (2, 2));

    assert_eq!(*progress.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_harness_keeps_other_verdicts_when_judge_fails() {
    let harness = EvaluationHarness::new(Arc::new(EchoTarget::new()), "echo")
        .with_evaluator(Conciseness::default())
        .with_evaluator(Correctness::new(Arc::new(ScriptedLLM::fixed("not json"))));

    let data = Dataset::new(
        "one",
        vec![Example::new("1", "What is inflation?", "Prices go up.")],
    );
    let experiment = harness.evaluate(&data, "eli5-test").await;

    let result = &experiment.results[0];
    assert!(!result.is_lost());
    assert_eq!(result.verdicts.len(), 1);
    assert!(result.verdict("conciseness").is_some());
    assert!(result.verdict("correctness").is_none());
    assert!(result.errors[0].starts_with("correctness:"));
}

#[tokio::test]
async fn test_harness_over_flaky_pipeline() {
    let llm = Arc::new(ScriptedLLM::new(|prompt: &str| {
        if prompt.contains("Context: No results found.") {
            Ok("I cannot answer without context.".to_string())
        } else {
            Ok(words(30))
        }
    }));
    let search = Arc::new(CountingSearch::with_contents(&["Some context."]));
    let pipeline = Pipeline::new(
        Variant::Flaky,
        llm,
        search.clone(),
        PipelineSettings::default(),
    );

    let data = Dataset::new(
        "flaky",
        vec![
            Example::new("1", "What is economics?", "The study of choices."),
            Example::new("2", "What is rain?", "Water falling from clouds."),
        ],
    );

    let harness = EvaluationHarness::new(Arc::new(pipeline), Variant::Flaky.as_str())
        .with_evaluator(Conciseness::default());
    let experiment = harness.evaluate(&data, "eli5-flaky").await;

    assert_eq!(search.calls(), 1);
    assert_eq!(experiment.lost_count(), 0);
    assert_eq!(
        experiment.results[0].output.as_deref(),
        Some("I cannot answer without context.")
    );
    assert_eq!(experiment.target, "flaky");
}
