//! Evaluation harness.
//!
//! Runs a [`Target`](crate::pipeline::Target) over a labeled [`Dataset`]
//! and scores each answer with a set of [`Evaluator`]s:
//!
//! - [`Conciseness`] - deterministic word-count limit
//! - [`Correctness`] - LLM-as-a-judge comparison with the reference answer
//!
//! The harness records per-example verdicts in an [`Experiment`]; it does
//! not compute aggregate statistics.

mod dataset;
mod error;
mod evaluators;
mod harness;
mod record;

pub use dataset::{Dataset, Example, ExampleInputs, ExampleOutputs};
pub use error::EvalError;
pub use evaluators::{
    build_correctness_prompt, Conciseness, Correctness, CorrectnessScore, Evaluator,
    CORRECTNESS_PROMPT,
};
pub use harness::{EvaluationHarness, ProgressFn};
pub use record::{EvaluationRecord, ExampleResult, Experiment, Verdict};
