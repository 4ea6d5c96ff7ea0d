//! Configuration loading, validation, and management for Loreweave.
//!
//! Loads configuration from `~/.loreweave/config.toml` with environment
//! variable overrides. Validates all settings at load.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.loreweave/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Selected completion provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Bearer credentials, keyed by provider identifier
    #[serde(default)]
    pub api_keys: HashMap<String, String>,

    /// Default model
    #[serde(default)]
    pub model: String,

    /// Whether completions should stream by default
    #[serde(default)]
    pub stream: bool,

    /// Instruction prepended to the story text in continuation mode
    #[serde(default = "default_prefix_prompt")]
    pub prefix_prompt: String,

    /// Default max tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub presence_penalty: f32,

    #[serde(default)]
    pub frequency_penalty: f32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Lorebook configuration
    #[serde(default)]
    pub lorebook: LorebookConfig,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_prefix_prompt() -> String {
    "Continue the text following the narration style of the user: ".into()
}
fn default_max_tokens() -> u32 {
    512
}
fn default_temperature() -> f32 {
    1.0
}
fn default_top_p() -> f32 {
    0.01
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.api_keys.keys().map(String::as_str).collect();
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("api_keys", &format!("[REDACTED; {} set]", keys.len()))
            .field("model", &self.model)
            .field("stream", &self.stream)
            .field("prefix_prompt", &self.prefix_prompt)
            .field("max_tokens", &self.max_tokens)
            .field("presence_penalty", &self.presence_penalty)
            .field("frequency_penalty", &self.frequency_penalty)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("lorebook", &self.lorebook)
            .finish()
    }
}

/// Lorebook-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LorebookConfig {
    /// How many trailing characters of the working text to search
    #[serde(default = "default_search_range")]
    pub search_range: usize,

    /// Vault folder holding lore files
    #[serde(default = "default_folder")]
    pub folder: String,

    /// Instructional prompt for lorebook entry generation
    #[serde(default = "default_lore_prompt")]
    pub prompt: String,
}

fn default_search_range() -> usize {
    1000
}
fn default_folder() -> String {
    "Lorebook".into()
}
fn default_lore_prompt() -> String {
    concat!(
        "You are an expert worldbuilding assistant.\n",
        "Given the following description, generate a lorebook entry in markdown format ",
        "for a story-writing tool.\n",
        "The entry MUST start with a YAML frontmatter block with a \"keys\" field ",
        "(a list of keywords relevant to the entry, in lower case, comma separated or as a YAML array).\n",
        "After the frontmatter, write a concise but detailed definition or description for the concept.\n",
        "Do not include anything except the frontmatter and the lorebook entry.",
    )
    .into()
}

impl Default for LorebookConfig {
    fn default() -> Self {
        Self {
            search_range: default_search_range(),
            folder: default_folder(),
            prompt: default_lore_prompt(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.loreweave/config.toml).
    ///
    /// Also checks environment variables:
    /// - `LOREWEAVE_API_KEY` (credential for the selected provider)
    /// - `OPENROUTER_API_KEY`, `DEEPSEEK_API_KEY` (per-provider credentials)
    /// - `LOREWEAVE_PROVIDER`, `LOREWEAVE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(provider) = std::env::var("LOREWEAVE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("LOREWEAVE_MODEL") {
            config.model = model;
        }

        // Per-provider credentials from the environment fill gaps only;
        // the config file wins.
        for (provider, var) in [("openrouter", "OPENROUTER_API_KEY"), ("deepseek", "DEEPSEEK_API_KEY")] {
            if !config.api_keys.contains_key(provider) {
                if let Ok(key) = std::env::var(var) {
                    config.api_keys.insert(provider.into(), key);
                }
            }
        }

        if let Ok(key) = std::env::var("LOREWEAVE_API_KEY") {
            config.api_keys.insert(config.provider.clone(), key);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".loreweave")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if self.lorebook.search_range == 0 {
            return Err(ConfigError::ValidationError(
                "lorebook.search_range must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// The credential for the selected provider, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_keys.get(&self.provider).map(String::as_str)
    }

    /// Whether the selected provider has a non-empty credential.
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some_and(|key| !key.is_empty())
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_keys: HashMap::new(),
            model: String::new(),
            stream: false,
            prefix_prompt: default_prefix_prompt(),
            max_tokens: default_max_tokens(),
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            temperature: default_temperature(),
            top_p: default_top_p(),
            lorebook: LorebookConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "openrouter");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.lorebook.search_range, 1000);
        assert_eq!(config.lorebook.folder, "Lorebook");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.lorebook.folder, config.lorebook.folder);
        assert!((parsed.top_p - config.top_p).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_search_range_rejected() {
        let mut config = AppConfig::default();
        config.lorebook.search_range = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().provider, "openrouter");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
provider = "deepseek"
model = "deepseek-chat"
stream = true

[api_keys]
deepseek = "sk-test"

[lorebook]
folder = "World"
search_range = 500
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider, "deepseek");
        assert_eq!(config.model, "deepseek-chat");
        assert!(config.stream);
        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.lorebook.folder, "World");
        assert_eq!(config.lorebook.search_range, 500);
        // Unset fields fall back to defaults
        assert_eq!(config.max_tokens, 512);
    }

    #[test]
    fn api_key_follows_selected_provider() {
        let mut config = AppConfig::default();
        config.api_keys.insert("deepseek".into(), "sk-ds".into());
        assert!(!config.has_api_key()); // selected provider is openrouter
        config.provider = "deepseek".into();
        assert_eq!(config.api_key(), Some("sk-ds"));
        assert!(config.has_api_key());
    }

    #[test]
    fn debug_redacts_credentials() {
        let mut config = AppConfig::default();
        config.api_keys.insert("openrouter".into(), "sk-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("openrouter"));
        assert!(toml_str.contains("Lorebook"));
    }
}
