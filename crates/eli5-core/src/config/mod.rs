//! Configuration management for ELI5.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority, `.env` is loaded first)
//! 2. Project-local `eli5.toml` file
//! 3. User config `~/.config/eli5/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Loads `KEY=value` pairs from an environment file into the process
/// environment, replacing variables that are already set.
///
/// Returns the number of variables applied. A missing file is not an error.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<usize, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(0);
    }

    let iter = dotenv::from_path_iter(path)
        .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;

    let mut applied = 0;
    for item in iter {
        let (key, value) =
            item.map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
        std::env::set_var(key, value);
        applied += 1;
    }

    tracing::debug!(path = %path.display(), applied, "Loaded environment file");
    Ok(applied)
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language model used by the explain stage.
    pub llm: LLMConfig,

    /// Language model used by the correctness judge. Falls back to `llm`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge: Option<LLMConfig>,

    /// Web search configuration.
    pub search: SearchConfig,

    /// Pipeline variant configuration.
    pub pipeline: PipelineConfig,

    /// Evaluation harness configuration.
    pub evaluation: EvaluationConfig,

    /// Storage configuration.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./eli5.toml` (project local)
    /// 2. `~/.config/eli5/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        load_env_file(DEFAULT_ENV_FILE)?;

        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("eli5").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Returns the configuration for the judge model.
    pub fn judge_llm(&self) -> LLMConfig {
        self.judge.clone().unwrap_or_else(|| self.llm.clone())
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // LLM overrides
        if let Ok(provider) = std::env::var("ELI5_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("ELI5_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Ok(url) = std::env::var("ELI5_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("ELI5_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(tokens) = std::env::var("ELI5_LLM_MAX_TOKENS") {
            if let Ok(n) = tokens.parse() {
                self.llm.max_tokens = n;
            }
        }
        if let Ok(temperature) = std::env::var("ELI5_LLM_TEMPERATURE") {
            if let Ok(t) = temperature.parse() {
                self.llm.temperature = t;
            }
        }

        // Judge overrides
        if let Ok(model) = std::env::var("ELI5_JUDGE_MODEL") {
            let mut judge = self.judge_llm();
            judge.model = Some(model);
            self.judge = Some(judge);
        }

        // Search overrides
        if let Ok(key) = std::env::var("ELI5_SEARCH_API_KEY") {
            self.search.api_key = Some(key);
        }
        if let Ok(n) = std::env::var("ELI5_SEARCH_MAX_RESULTS") {
            if let Ok(n) = n.parse() {
                self.search.max_results = n;
            }
        }

        // Pipeline overrides
        if let Ok(variant) = std::env::var("ELI5_VARIANT") {
            self.pipeline.variant = variant;
        }

        // Storage overrides
        if let Ok(dir) = std::env::var("ELI5_DATA_DIR") {
            self.storage.data_dir = dir;
        }
    }

    /// Checks values that would otherwise fail late, at request time.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be at least 1".to_string(),
            ));
        }
        if self.evaluation.max_words == 0 {
            return Err(ConfigError::Invalid(
                "evaluation.max_words must be at least 1".to_string(),
            ));
        }
        if self.pipeline.variant.parse::<crate::pipeline::Variant>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown pipeline variant '{}'",
                self.pipeline.variant
            )));
        }
        Ok(())
    }

    /// Renders this configuration as TOML. API keys are never written.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        Config::default().to_toml_string()
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "openai", "anthropic", "ollama", or "openrouter".
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for API (for openai-compatible providers).
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// API version (for Anthropic).
    pub api_version: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,
            base_url: None,
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_version: Some(DEFAULT_ANTHROPIC_API_VERSION.to_string()),
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_MODEL.to_string(),
            "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        })
    }

    /// Get the base URL, falling back to provider defaults.
    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| match self.provider.as_str() {
                "anthropic" | "claude" => DEFAULT_ANTHROPIC_URL.to_string(),
                "ollama" => DEFAULT_OLLAMA_URL.to_string(),
                "openrouter" => DEFAULT_OPENROUTER_URL.to_string(),
                _ => DEFAULT_OPENAI_URL.to_string(),
            })
    }

    /// Get API key from config or environment.
    pub fn api_key_or_env(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ELI5_LLM_API_KEY").ok())
            .or_else(|| match self.provider.as_str() {
                "anthropic" | "claude" => std::env::var("ANTHROPIC_API_KEY").ok(),
                "openrouter" => std::env::var("OPENROUTER_API_KEY").ok(),
                _ => std::env::var("OPENAI_API_KEY").ok(),
            })
    }
}

/// Web search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search provider name. Only "tavily" is supported.
    pub provider: String,

    /// Base URL of the search API.
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Number of results requested per query.
    pub max_results: usize,

    /// Provider-specific search depth.
    pub search_depth: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_SEARCH_PROVIDER.to_string(),
            base_url: None,
            api_key: None,
            max_results: DEFAULT_SEARCH_MAX_RESULTS,
            search_depth: DEFAULT_SEARCH_DEPTH.to_string(),
        }
    }
}

impl SearchConfig {
    /// Get the base URL, falling back to the provider default.
    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TAVILY_URL.to_string())
    }

    /// Get API key from config or environment.
    pub fn api_key_or_env(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ELI5_SEARCH_API_KEY").ok())
            .or_else(|| std::env::var("TAVILY_API_KEY").ok())
    }
}

/// Pipeline variant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Variant name: "working", "buggy" or "flaky".
    pub variant: String,

    /// Substring that makes the flaky search stage skip the search call.
    pub flaky_marker: String,

    /// Document content substituted by the flaky search stage.
    pub no_results_text: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            variant: DEFAULT_VARIANT.to_string(),
            flaky_marker: DEFAULT_FLAKY_MARKER.to_string(),
            no_results_text: DEFAULT_NO_RESULTS_TEXT.to_string(),
        }
    }
}

/// Evaluation harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Dataset name or path.
    pub dataset: String,

    /// Prefix for experiment names.
    pub experiment_prefix: String,

    /// Word limit used by the conciseness evaluator.
    pub max_words: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            experiment_prefix: DEFAULT_EXPERIMENT_PREFIX.to_string(),
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for eli5 data (default: ".eli5").
    pub data_dir: String,

    /// Dataset subdirectory name.
    pub datasets_dir: String,

    /// Experiment subdirectory name.
    pub experiments_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            datasets_dir: DEFAULT_DATASETS_DIR.to_string(),
            experiments_dir: DEFAULT_EXPERIMENTS_DIR.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the full path to the datasets directory.
    pub fn datasets_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.datasets_dir)
    }

    /// Get the full path to the experiments directory.
    pub fn experiments_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.experiments_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.search.max_results, 1);
        assert_eq!(config.pipeline.flaky_marker, "economics");
        assert_eq!(config.evaluation.max_words, 200);
        assert_eq!(config.storage.data_dir, DEFAULT_DATA_DIR);
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[llm]"));
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("[pipeline]"));
        assert!(toml_str.contains("[evaluation]"));
        assert!(toml_str.contains("[storage]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_judge_falls_back_to_llm() {
        let mut config = Config::default();
        config.llm.model = Some("gpt-4o-mini".to_string());
        assert_eq!(config.judge_llm().model.as_deref(), Some("gpt-4o-mini"));

        config.judge = Some(LLMConfig {
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        });
        assert_eq!(config.judge_llm().model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_validate_rejects_unknown_variant() {
        let mut config = Config::default();
        config.pipeline.variant = "sideways".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_results() {
        let mut config = Config::default();
        config.search.max_results = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_paths() {
        let config = StorageConfig::default();
        assert_eq!(config.datasets_path(), PathBuf::from(".eli5/datasets"));
        assert_eq!(config.experiments_path(), PathBuf::from(".eli5/experiments"));
    }
}
