//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the court search application, loaded from a
//! TOML file with environment-variable overrides, validated once at startup
//! and passed explicitly to the components that need it.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Range checks, URL sanity, fallback-policy parsing
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Web server settings
    pub server: ServerConfig,
    /// Target court site settings
    pub court: CourtConfig,
    /// Outbound HTTP client behavior
    pub http: HttpClientConfig,
    /// What to do when live retrieval fails
    pub fallback: FallbackConfig,
    /// Database settings
    pub storage: StorageConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable CORS for the JSON endpoints
    pub enable_cors: bool,
}

/// Target court site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    /// Display name used in rendered records and log rows
    pub name: String,
    /// Base URL of the court website
    pub base_url: String,
    /// Path of the case-status search page, relative to `base_url`
    pub search_path: String,
    /// URLs probed by connectivity checks, tried in order
    pub probe_urls: Vec<String>,
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Total attempts for idempotent requests (first try included)
    pub max_retries: u32,
    /// Base delay for exponential backoff between attempts
    pub retry_backoff_ms: u64,
    /// User-Agent header sent to the court site
    pub user_agent: String,
}

/// Policy applied when no live case record could be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Return a clearly-marked synthetic record
    Demo,
    /// Report the failure without substituting data
    NotFound,
}

/// Fallback behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub policy: FallbackPolicy,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file path
    pub db_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Emit structured JSON log lines instead of human-readable ones
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| AppError::Config {
                message: format!("failed to read config file {:?}: {}", path, e),
            })?;
            toml::from_str(&content).map_err(|e| AppError::Config {
                message: format!("failed to parse config file {:?}: {}", path, e),
            })?
        } else {
            tracing::warn!("configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("COURT_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("COURT_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| AppError::Config {
                message: "invalid port number in COURT_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(base_url) = std::env::var("COURT_SEARCH_BASE_URL") {
            self.court.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("COURT_SEARCH_TIMEOUT_SECONDS") {
            self.http.timeout_seconds = timeout.parse().map_err(|_| AppError::Config {
                message: "invalid value in COURT_SEARCH_TIMEOUT_SECONDS".to_string(),
            })?;
        }
        if let Ok(retries) = std::env::var("COURT_SEARCH_MAX_RETRIES") {
            self.http.max_retries = retries.parse().map_err(|_| AppError::Config {
                message: "invalid value in COURT_SEARCH_MAX_RETRIES".to_string(),
            })?;
        }
        if let Ok(db_path) = std::env::var("COURT_SEARCH_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }
        if let Ok(level) = std::env::var("COURT_SEARCH_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::validation("server.port", "port cannot be zero"));
        }

        if !self.court.base_url.starts_with("http://") && !self.court.base_url.starts_with("https://")
        {
            return Err(AppError::validation(
                "court.base_url",
                "base URL must start with http:// or https://",
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(AppError::validation(
                "http.timeout_seconds",
                "timeout must be at least one second",
            ));
        }

        if self.http.max_retries == 0 {
            return Err(AppError::validation(
                "http.max_retries",
                "at least one attempt is required",
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            court: CourtConfig::default(),
            http: HttpClientConfig::default(),
            fallback: FallbackConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            name: "Wardha District Court".to_string(),
            base_url: "https://wardha.dcourts.gov.in".to_string(),
            search_path: "/case-status-search-by-case-number/".to_string(),
            probe_urls: vec![
                "https://wardha.dcourts.gov.in/".to_string(),
                "https://wardha.dcourts.gov.in/case-status-search-by-case-number/".to_string(),
                "https://districts.ecourts.gov.in/wardha".to_string(),
                "https://services.ecourts.gov.in/ecourtindia_v6/".to_string(),
            ],
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            max_retries: 3,
            retry_backoff_ms: 500,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            policy: FallbackPolicy::Demo,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./db/court_queries.db"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fallback.policy, FallbackPolicy::Demo);
    }

    #[test]
    fn rejects_zero_retries() {
        let mut config = Config::default();
        config.http.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = Config::default();
        config.court.base_url = "ftp://court.example".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_fallback_policy_from_toml() {
        let parsed: Config = toml::from_str(
            r#"
            [fallback]
            policy = "not-found"
            "#,
        )
        .expect("config should parse");
        assert_eq!(parsed.fallback.policy, FallbackPolicy::NotFound);
    }
}
