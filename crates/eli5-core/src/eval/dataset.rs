use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;

use super::EvalError;

/// Extensions tried, in order, when resolving a dataset by name.
const DATASET_EXTENSIONS: &[&str] = &["json", "jsonl", "yaml", "yml"];

/// Input side of an example: `{"question": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleInputs {
    pub question: String,
}

/// Reference side of an example: `{"output": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleOutputs {
    pub output: String,
}

/// A labeled (question, reference answer) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub inputs: ExampleInputs,
    pub outputs: ExampleOutputs,
}

impl Example {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            inputs: ExampleInputs {
                question: question.into(),
            },
            outputs: ExampleOutputs {
                output: reference.into(),
            },
        }
    }

    pub fn question(&self) -> &str {
        &self.inputs.question
    }

    pub fn reference(&self) -> &str {
        &self.outputs.output
    }
}

/// Row shapes accepted in dataset files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawExample {
    Nested {
        #[serde(default)]
        id: Option<String>,
        inputs: ExampleInputs,
        outputs: ExampleOutputs,
    },
    Flat {
        #[serde(default)]
        id: Option<String>,
        question: String,
        #[serde(alias = "output", alias = "reference")]
        answer: String,
    },
}

impl RawExample {
    fn into_example(self, index: usize) -> Example {
        let fallback = || (index + 1).to_string();
        match self {
            RawExample::Nested {
                id,
                inputs,
                outputs,
            } => Example {
                id: id.unwrap_or_else(fallback),
                inputs,
                outputs,
            },
            RawExample::Flat {
                id,
                question,
                answer,
            } => Example::new(id.unwrap_or_else(fallback), question, answer),
        }
    }
}

/// Whole-file layouts: a bare list of rows or `{ examples: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDataset {
    List(Vec<RawExample>),
    Wrapped {
        #[serde(default)]
        name: Option<String>,
        examples: Vec<RawExample>,
    },
}

/// A named collection of examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub examples: Vec<Example>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, examples: Vec<Example>) -> Self {
        Self {
            name: name.into(),
            examples,
        }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Resolves a dataset by path or by name.
    ///
    /// An existing path is loaded directly. Otherwise `name` is looked up
    /// in the datasets directory with each supported extension.
    pub fn resolve(name_or_path: &str, storage: &StorageConfig) -> Result<Self, EvalError> {
        let direct = Path::new(name_or_path);
        if direct.is_file() {
            return Self::load(direct);
        }

        let dir = storage.datasets_path();
        DATASET_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name_or_path, ext)))
            .find(|candidate| candidate.is_file())
            .map_or_else(
                || Err(EvalError::DatasetNotFound(name_or_path.to_string())),
                |path| Self::load(&path),
            )
    }

    /// Loads a dataset file. The format follows the extension:
    /// `.json`, `.jsonl` or `.yaml`/`.yml`.
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let content = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let (name, rows) = match extension.as_str() {
            "jsonl" => (None, parse_jsonl(path, &content)?),
            "yaml" | "yml" => {
                let raw: RawDataset = serde_yaml::from_str(&content)
                    .map_err(|e| EvalError::invalid(path, e.to_string()))?;
                raw.into_parts()
            }
            "json" => {
                let raw: RawDataset = serde_json::from_str(&content)
                    .map_err(|e| EvalError::invalid(path, e.to_string()))?;
                raw.into_parts()
            }
            other => {
                return Err(EvalError::invalid(
                    path,
                    format!("unsupported dataset format '{}'", other),
                ))
            }
        };

        let name = name.unwrap_or_else(|| default_name(path));
        let examples = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_example(i))
            .collect::<Vec<_>>();

        tracing::debug!(dataset = %name, examples = examples.len(), "Loaded dataset");
        Ok(Self::new(name, examples))
    }
}

impl RawDataset {
    fn into_parts(self) -> (Option<String>, Vec<RawExample>) {
        match self {
            RawDataset::List(rows) => (None, rows),
            RawDataset::Wrapped { name, examples } => (name, examples),
        }
    }
}

fn parse_jsonl(path: &Path, content: &str) -> Result<Vec<RawExample>, EvalError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| EvalError::invalid(path, format!("line {}: {}", n + 1, e)))
        })
        .collect()
}

fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
