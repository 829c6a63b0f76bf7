//! Configuration management for Quickchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{QuickchatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Quickchat
///
/// Loaded once at process start and handed to the components that
/// need it; nothing reads configuration from globals afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat history storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Session secret; accepted for deployment parity, not used for signing
    #[serde(default)]
    pub session_secret: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_secret: None,
        }
    }
}

impl ServerConfig {
    /// Socket address string in `host:port` form
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat history storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON history document
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
}

fn default_history_file() -> PathBuf {
    PathBuf::from("chat_history.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
        }
    }
}

/// Provider configuration
///
/// Specifies which completion provider to use and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Number of trailing history messages included as prompt context
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

fn default_context_messages() -> usize {
    4
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            context_messages: default_context_messages(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for completions
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL (useful for tests and local mocks)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout")]
    pub timeout_seconds: u64,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_timeout() -> u64 {
    60
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            timeout_seconds: default_gemini_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QuickchatError::Config(format!("Failed to read config file: {}", e)))?;
        let config = serde_yaml::from_str(&contents).map_err(QuickchatError::Yaml)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            self.provider.gemini.api_key = Some(api_key);
        }

        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            self.server.session_secret = Some(secret);
        }

        if let Ok(host) = std::env::var("QUICKCHAT_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("QUICKCHAT_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid QUICKCHAT_PORT: {}", port);
            }
        }

        if let Ok(history_file) = std::env::var("QUICKCHAT_HISTORY_FILE") {
            self.storage.history_file = PathBuf::from(history_file);
        }

        if let Ok(model) = std::env::var("QUICKCHAT_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("QUICKCHAT_API_BASE") {
            tracing::debug!(api_base = %api_base, "Env override: QUICKCHAT_API_BASE");
            self.provider.gemini.api_base = api_base;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }

        if let Some(port) = cli.port {
            self.server.port = port;
        }

        if let Some(history_file) = &cli.history_file {
            self.storage.history_file = history_file.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["gemini"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(QuickchatError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.provider.gemini.model.trim().is_empty() {
            return Err(
                QuickchatError::Validation("provider.gemini.model cannot be empty".to_string()).into(),
            );
        }

        if self.provider.gemini.timeout_seconds == 0 {
            return Err(QuickchatError::Validation(
                "provider.gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.provider.context_messages == 0 {
            return Err(QuickchatError::Validation(
                "provider.context_messages must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.port == 0 {
            return Err(
                QuickchatError::Validation("server.port must be greater than 0".to_string()).into(),
            );
        }

        if self.storage.history_file.as_os_str().is_empty() {
            return Err(QuickchatError::Validation(
                "storage.history_file cannot be empty".to_string(),
            )
            .into());
        }

        if self.provider.gemini.api_key.is_none() {
            tracing::warn!("No GEMINI_API_KEY configured; completions will fall back to apologies");
        }

        Ok(())
    }
}
