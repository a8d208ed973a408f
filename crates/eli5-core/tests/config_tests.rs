use eli5_core::config::{
    DEFAULT_ANTHROPIC_MODEL, DEFAULT_DATA_DIR, DEFAULT_FLAKY_MARKER, DEFAULT_LLM_PROVIDER,
    DEFAULT_MAX_WORDS, DEFAULT_OLLAMA_MODEL, DEFAULT_OPENAI_MODEL, DEFAULT_SEARCH_MAX_RESULTS,
};
use eli5_core::{Config, ConfigError, LLMConfig};
use serial_test::serial;
use tempfile::TempDir;

/// Every variable `Config::from_file` consults.
const OVERRIDE_VARS: &[&str] = &[
    "ELI5_LLM_PROVIDER",
    "ELI5_LLM_MODEL",
    "ELI5_LLM_BASE_URL",
    "ELI5_LLM_API_KEY",
    "ELI5_LLM_MAX_TOKENS",
    "ELI5_LLM_TEMPERATURE",
    "ELI5_JUDGE_MODEL",
    "ELI5_SEARCH_API_KEY",
    "ELI5_SEARCH_MAX_RESULTS",
    "ELI5_VARIANT",
    "ELI5_DATA_DIR",
];

fn clear_overrides() {
    for var in OVERRIDE_VARS {
        std::env::remove_var(var);
    }
}

/// Writes `content` to an `eli5.toml` in a fresh temp dir.
fn config_file(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eli5.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
    assert_eq!(config.llm.temperature, 0.0);
    assert!(config.judge.is_none());
    assert_eq!(config.search.max_results, DEFAULT_SEARCH_MAX_RESULTS);
    assert_eq!(config.pipeline.variant, "working");
    assert_eq!(config.pipeline.flaky_marker, DEFAULT_FLAKY_MARKER);
    assert_eq!(config.evaluation.max_words, DEFAULT_MAX_WORDS);
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
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[llm]
provider = "ollama"
model = "llama3"

[judge]
provider = "openai"
model = "gpt-4o"

[pipeline]
variant = "flaky"

[evaluation]
dataset = "my-golden"
max_words = 120

[storage]
data_dir = ".custom-eli5"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.llm.provider, "ollama");
    assert_eq!(config.llm.model, Some("llama3".to_string()));
    assert_eq!(config.judge_llm().model, Some("gpt-4o".to_string()));
    assert_eq!(config.pipeline.variant, "flaky");
    assert_eq!(config.evaluation.dataset, "my-golden");
    assert_eq!(config.evaluation.max_words, 120);
    assert_eq!(config.storage.data_dir, ".custom-eli5");
    // Unset sections keep their defaults.
    assert_eq!(config.search.max_results, DEFAULT_SEARCH_MAX_RESULTS);
}

#[test]
fn test_judge_falls_back_to_llm() {
    let mut config = Config::default();
    config.llm.model = Some("gpt-4o-mini".to_string());
    assert_eq!(config.judge_llm().model, Some("gpt-4o-mini".to_string()));
}

#[test]
#[serial]
fn test_from_file_rejects_unknown_variant() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eli5.toml");
    std::fs::write(&path, "[pipeline]\nvariant = \"sloppy\"\n").unwrap();

    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("sloppy")));
}

#[test]
#[serial]
fn test_from_file_rejects_zero_word_limit() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eli5.toml");
    std::fs::write(&path, "[evaluation]\nmax_words = 0\n").unwrap();

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
#[serial]
fn test_from_file_reports_bad_toml() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eli5.toml");
    std::fs::write(&path, "[llm\nprovider = ").unwrap();

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_model_or_default() {
    let mut config = LLMConfig {
        provider: "anthropic".to_string(),
        ..Default::default()
    };
    assert_eq!(config.model_or_default(), DEFAULT_ANTHROPIC_MODEL);

    config.provider = "ollama".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_OLLAMA_MODEL);

    config.provider = "openai".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_OPENAI_MODEL);

    config.model = Some("custom-model".to_string());
    assert_eq!(config.model_or_default(), "custom-model");
}

#[test]
fn test_env_file_overrides_existing_variables() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        "ELI5_TEST_ENV_FILE_KEY=from-file\n# comment\nELI5_TEST_ENV_FILE_OTHER=\"quoted value\"\n",
    )
    .unwrap();
    std::env::set_var("ELI5_TEST_ENV_FILE_KEY", "from-process");

    let applied = eli5_core::config::load_env_file(&path).unwrap();

    assert_eq!(applied, 2);
    assert_eq!(std::env::var("ELI5_TEST_ENV_FILE_KEY").unwrap(), "from-file");
    assert_eq!(
        std::env::var("ELI5_TEST_ENV_FILE_OTHER").unwrap(),
        "quoted value"
    );
}

#[test]
fn test_missing_env_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let applied = eli5_core::config::load_env_file(dir.path().join("absent.env")).unwrap();
    assert_eq!(applied, 0);
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_overrides();
    let (_dir, path) = config_file(
        r#"
[llm]
provider = "openai"
model = "gpt-4o"
temperature = 0.0
max_tokens = 4096

[pipeline]
variant = "working"

[storage]
data_dir = ".from-file"
"#,
    );
    std::env::set_var("ELI5_LLM_MODEL", "gpt-4o-mini");
    std::env::set_var("ELI5_LLM_TEMPERATURE", "0.7");
    std::env::set_var("ELI5_LLM_MAX_TOKENS", "256");
    std::env::set_var("ELI5_VARIANT", "flaky");
    std::env::set_var("ELI5_SEARCH_MAX_RESULTS", "3");
    std::env::set_var("ELI5_SEARCH_API_KEY", "tvly-env");
    std::env::set_var("ELI5_DATA_DIR", ".from-env");

    let config = Config::from_file(&path);
    clear_overrides();
    let config = config.unwrap();

    assert_eq!(config.llm.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(config.llm.temperature, 0.7);
    assert_eq!(config.llm.max_tokens, 256);
    assert_eq!(config.pipeline.variant, "flaky");
    assert_eq!(config.search.max_results, 3);
    assert_eq!(config.search.api_key.as_deref(), Some("tvly-env"));
    assert_eq!(config.storage.data_dir, ".from-env");
}

#[test]
#[serial]
fn test_unparsable_numeric_override_is_ignored() {
    clear_overrides();
    let (_dir, path) = config_file("[llm]\ntemperature = 0.2\nmax_tokens = 1000\n");
    std::env::set_var("ELI5_LLM_TEMPERATURE", "warm");
    std::env::set_var("ELI5_LLM_MAX_TOKENS", "lots");

    let config = Config::from_file(&path);
    clear_overrides();
    let config = config.unwrap();

    assert_eq!(config.llm.temperature, 0.2);
    assert_eq!(config.llm.max_tokens, 1000);
}

#[test]
#[serial]
fn test_judge_model_override_copies_llm_section() {
    clear_overrides();
    let (_dir, path) = config_file(
        r#"
[llm]
provider = "anthropic"
model = "claude-3-haiku"
base_url = "https://proxy.example.com/v1/messages"
"#,
    );
    std::env::set_var("ELI5_JUDGE_MODEL", "claude-3-opus");

    let config = Config::from_file(&path);
    clear_overrides();
    let config = config.unwrap();

    let judge = config.judge.expect("judge section built from [llm]");
    assert_eq!(judge.provider, "anthropic");
    assert_eq!(judge.model.as_deref(), Some("claude-3-opus"));
    assert_eq!(
        judge.base_url.as_deref(),
        Some("https://proxy.example.com/v1/messages")
    );
    assert_eq!(config.llm.model.as_deref(), Some("claude-3-haiku"));
}

#[test]
#[serial]
fn test_judge_model_override_keeps_explicit_judge_section() {
    clear_overrides();
    let (_dir, path) = config_file(
        r#"
[llm]
provider = "ollama"

[judge]
provider = "openai"
model = "gpt-4o"
"#,
    );
    std::env::set_var("ELI5_JUDGE_MODEL", "gpt-4.1");

    let config = Config::from_file(&path);
    clear_overrides();
    let judge = config.unwrap().judge_llm();

    assert_eq!(judge.provider, "openai");
    assert_eq!(judge.model.as_deref(), Some("gpt-4.1"));
}

#[test]
#[serial]
fn test_zero_max_results_override_is_rejected() {
    clear_overrides();
    let (_dir, path) = config_file("[search]\nmax_results = 2\n");
    std::env::set_var("ELI5_SEARCH_MAX_RESULTS", "0");

    let result = Config::from_file(&path);
    clear_overrides();

    assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("max_results")));
}

#[test]
#[serial]
fn test_unknown_variant_override_is_rejected() {
    clear_overrides();
    let (_dir, path) = config_file("[pipeline]\nvariant = \"buggy\"\n");
    std::env::set_var("ELI5_VARIANT", "chaotic");

    let result = Config::from_file(&path);
    clear_overrides();

    assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("chaotic")));
}
