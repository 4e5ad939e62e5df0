//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::client::ClientConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_upload_chunk_size")]
    pub upload_chunk_size: usize,

    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_upload_chunk_size() -> usize {
    64 * 1024 // 64 KB
}

fn default_upload_timeout() -> u64 {
    300 // 5 minutes
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            upload_chunk_size: default_upload_chunk_size(),
            upload_timeout_secs: default_upload_timeout(),
        }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

fn default_state_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("mux").to_string_lossy().to_string())
        .unwrap_or_else(|| "./mux_state".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, the default locations, or the environment
    ///
    /// An explicit path that cannot be loaded is an error; unreadable files
    /// at the default locations are skipped with a warning.
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("mux").join("config.toml")),
            Some(PathBuf::from("./mux.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("MUX_API_URL") {
            self.api.base_url = url;
        }
        if let Some(dir) = var("MUX_STATE_DIR") {
            self.session.state_dir = dir;
        }
        if let Some(level) = var("MUX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("MUX_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// HTTP client settings derived from `[api]`
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: self.api.request_timeout_secs,
            upload_chunk_size: self.api.upload_chunk_size.max(1),
            upload_timeout_secs: self.api.upload_timeout_secs,
        }
    }

    /// Directory holding the durable store, with `~` expanded
    pub fn state_dir(&self) -> PathBuf {
        expand_home(&self.session.state_dir)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# MUX client configuration
#
# Environment variables override these settings:
# - MUX_API_URL
# - MUX_STATE_DIR
# - MUX_LOG_LEVEL
# - MUX_LOG_FORMAT

[api]
# Backend base URL
base_url = "http://localhost:8080"

# Request timeout in seconds (uploads use upload_timeout_secs instead)
request_timeout_secs = 30

# Upload body chunk size (bytes); progress is reported once per chunk
upload_chunk_size = 65536

# Timeout in seconds for a whole upload, body included
upload_timeout_secs = 300

[session]
# Directory holding the session token and preferences
state_dir = "~/.local/share/mux"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
