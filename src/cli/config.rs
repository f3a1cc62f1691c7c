//! Configuration management for LeadPilot
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.leadpilot/config.toml
//!
//! The API key is never compiled in. `OPENROUTER_API_KEY` takes precedence
//! over `openrouter.api_key` in the file.

use crate::errors::{LeadError, Result};
use crate::streaming::client::{
    ChatClientConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_REFERER, DEFAULT_TEMPERATURE,
    DEFAULT_TITLE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Complete configuration for LeadPilot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// Chat completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub referer: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Mock document processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub processing_delay_ms: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            api_key: None,
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2000,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LeadError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| LeadError::ConfigError(format!("Failed to parse config: {}", e)))?;

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

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".leadpilot").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.openrouter.endpoint.trim().is_empty() {
            return Err(LeadError::ConfigError(
                "endpoint must not be empty".to_string(),
            ));
        }

        if self.openrouter.model.trim().is_empty() {
            return Err(LeadError::ConfigError("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.openrouter.temperature) {
            return Err(LeadError::ConfigError(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| LeadError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LeadError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| LeadError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Write the default configuration to `path`, refusing to overwrite
    pub fn write_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(LeadError::ConfigError(format!(
                "{} already exists",
                path.display()
            )));
        }

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// API key from `env_value` if set, else from the file
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.openrouter.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Client settings with the key taken from the environment or the file
    pub fn chat_client_config(&self) -> ChatClientConfig {
        let env_key = std::env::var(API_KEY_ENV).ok();
        ChatClientConfig {
            endpoint: self.openrouter.endpoint.clone(),
            api_key: self.resolve_api_key(env_key),
            model: self.openrouter.model.clone(),
            temperature: self.openrouter.temperature,
            referer: self.openrouter.referer.clone(),
            title: self.openrouter.title.clone(),
        }
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &Path) -> PathBuf {
        if let Ok(rest) = path.strip_prefix("~") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        path.to_path_buf()
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.documents.processing_delay_ms)
    }

    /// Copy with the key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.openrouter.api_key.is_some() {
            copy.openrouter.api_key = Some("<redacted>".to_string());
        }
        copy
    }
}
