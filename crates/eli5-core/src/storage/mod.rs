mod error;
mod file;

pub use error::StorageError;
pub use file::FileExperimentStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::eval::Experiment;

/// Short description of a recorded experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub id: String,
    pub name: String,
    pub dataset: String,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub examples: usize,
    pub lost: usize,
}

impl From<&Experiment> for ExperimentSummary {
    fn from(experiment: &Experiment) -> Self {
        Self {
            id: experiment.id.clone(),
            name: experiment.name.clone(),
            dataset: experiment.dataset.clone(),
            target: experiment.target.clone(),
            started_at: experiment.started_at,
            examples: experiment.results.len(),
            lost: experiment.lost_count(),
        }
    }
}

/// Trait for experiment storage backends.
///
/// Stands in for a hosted evaluation-tracking service: experiments are
/// recorded as-is for later comparison.
pub trait ExperimentStore {
    /// Saves an experiment, replacing any previous record with the same id.
    fn save_experiment(&self, experiment: &Experiment) -> Result<(), StorageError>;

    /// Loads an experiment by id.
    fn load_experiment(&self, id: &str) -> Result<Experiment, StorageError>;

    /// Lists recorded experiments, most recent first.
    fn list_experiments(&self) -> Result<Vec<ExperimentSummary>, StorageError>;
}
