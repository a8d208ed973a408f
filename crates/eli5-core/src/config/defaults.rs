//! Default values for ELI5 configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider.
pub const DEFAULT_LLM_PROVIDER: &str = "openai";

/// Default max tokens for LLM responses.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default sampling temperature. Zero keeps answers and judgments stable.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

// Anthropic defaults
/// Default Anthropic API URL.
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
/// Default Anthropic model.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
/// Default Anthropic API version.
pub const DEFAULT_ANTHROPIC_API_VERSION: &str = "2023-06-01";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

// OpenRouter defaults
/// Default OpenRouter API URL.
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// Search Defaults
// ============================================================================

/// Default web search provider.
pub const DEFAULT_SEARCH_PROVIDER: &str = "tavily";

/// Default Tavily API URL.
pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

/// Number of search results folded into the context document.
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 1;

/// Default Tavily search depth ("basic" or "advanced").
pub const DEFAULT_SEARCH_DEPTH: &str = "basic";

// ============================================================================
// Pipeline Defaults
// ============================================================================

/// Default pipeline variant.
pub const DEFAULT_VARIANT: &str = "working";

/// Questions containing this substring skip search in the flaky variant.
pub const DEFAULT_FLAKY_MARKER: &str = "economics";

/// Content of the document the flaky search stage substitutes.
pub const DEFAULT_NO_RESULTS_TEXT: &str = "No results found.";

// ============================================================================
// Evaluation Defaults
// ============================================================================

/// Default dataset name.
pub const DEFAULT_DATASET: &str = "eli5-golden";

/// Default experiment prefix.
pub const DEFAULT_EXPERIMENT_PREFIX: &str = "eli5-gpt4o";

/// Maximum number of words a concise answer may contain.
pub const DEFAULT_MAX_WORDS: usize = 200;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = ".eli5";

/// Default datasets subdirectory.
pub const DEFAULT_DATASETS_DIR: &str = "datasets";

/// Default experiments subdirectory.
pub const DEFAULT_EXPERIMENTS_DIR: &str = "experiments";

/// Default environment file loaded at startup.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Project-local configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "eli5.toml";
