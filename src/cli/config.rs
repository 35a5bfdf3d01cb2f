//! Configuration management for tutorbuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.tutorbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TutorError};

/// Complete configuration for tutorbuddy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub tutor: TutorConfig,
    pub conversation: ConversationConfig,
    pub paths: PathsConfig,
}

/// Chat-completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

/// Fixed request parameters sent with every prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TutorConfig {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Conversation practice configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConversationConfig {
    /// Turns resent as context; unset resends the whole conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_context_turns: Option<usize>,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub progress_file: String,
    pub history_file: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful English tutor.".to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            progress_file: "progress.json".to_string(),
            history_file: "~/.tutorbuddy_history".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TutorError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| TutorError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".tutorbuddy").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(TutorError::Config("api.base_url must not be empty".to_string()));
        }

        if self.api.model.trim().is_empty() {
            return Err(TutorError::Config("api.model must not be empty".to_string()));
        }

        if self.api.api_key_env.trim().is_empty() {
            return Err(TutorError::Config(
                "api.api_key_env must name an environment variable".to_string(),
            ));
        }

        if self.tutor.max_tokens == 0 {
            return Err(TutorError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.tutor.temperature) {
            return Err(TutorError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.conversation.max_context_turns == Some(0) {
            return Err(TutorError::Config(
                "max_context_turns must be greater than 0 when set".to_string(),
            ));
        }

        if self.paths.progress_file.trim().is_empty() {
            return Err(TutorError::Config(
                "paths.progress_file must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Render as TOML for display
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TutorError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Progress file path
    pub fn progress_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.progress_file)
    }

    /// REPL history file path
    pub fn history_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.history_file)
    }

    /// Apply command-line overrides on top of the loaded file
    pub fn with_overrides(mut self, model: Option<&str>, progress_file: Option<&Path>) -> Self {
        if let Some(model) = model {
            self.api.model = model.to_string();
        }
        if let Some(path) = progress_file {
            self.paths.progress_file = path.display().to_string();
        }
        self
    }

    /// Read the API key named by `api.api_key_env` from the environment
    pub fn credential(&self) -> Result<Credential> {
        Credential::from_env(&self.api.api_key_env)
    }
}

/// API key read from the process environment
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Read the credential from environment variable `var`
    pub fn from_env(var: &str) -> Result<Self> {
        Self::from_lookup(var, |name| std::env::var(name).ok())
    }

    /// Read the credential through an arbitrary lookup function
    pub fn from_lookup<F>(var: &str, lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(var) {
            Some(value) if !value.trim().is_empty() => Ok(Credential(value.trim().to_string())),
            _ => Err(TutorError::Config(format!(
                "API key not found. Please set the {} environment variable.",
                var
            ))),
        }
    }

    /// Raw key for the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}
