//! Configuration module for the triage engine
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TRIAGE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! Secrets (API keys, the store service key) are never read from the
//! TOML file; config sections only name the environment variables that
//! hold them.

pub mod error;
pub mod limits;
pub mod llm;
pub mod logging;
pub mod search;
pub mod server;
pub mod store;

pub use error::ConfigError;
pub use limits::{LimitsConfig, RateLimitParams};
pub use llm::LlmConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use search::SearchConfig;
pub use server::ServerConfig;
pub use store::StoreConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the triage engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TriageConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Chat-completion backend
    pub llm: LlmConfig,
    /// Web search providers
    pub search: SearchConfig,
    /// Supabase store
    pub store: StoreConfig,
    /// Per-feature rate limits
    pub limits: LimitsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TriageConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports TRIAGE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("TRIAGE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("TRIAGE_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("TRIAGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TRIAGE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(url) = std::env::var("TRIAGE_STORE_URL") {
            self.store.url = url;
        }
        if let Ok(model) = std::env::var("TRIAGE_LLM_MODEL") {
            self.llm.model = model;
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        if self.store.url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "store.url".to_string(),
                message: "store URL cannot be empty".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Validation {
                field: "llm.temperature".to_string(),
                message: "temperature must be between 0.0 and 2.0".to_string(),
            });
        }

        for (field, params) in [
            ("limits.diagnosis", &self.limits.diagnosis),
            ("limits.parts_search", &self.limits.parts_search),
        ] {
            if params.max_requests == 0 || params.window_secs == 0 {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "rate limit window and cap must be non-zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_triage_config_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.limits.diagnosis.max_requests, 5);
        assert_eq!(config.store.table, "diagnostic_submissions");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [server]
        port = 9000
        "#;

        let config: TriageConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0"); // Default
    }

    #[test]
    fn test_config_parse_full_toml() {
        let toml = include_str!("../../triage.example.toml");
        let config: TriageConfig = toml::from_str(toml).unwrap();
        assert!(config.server.port > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 8080").unwrap();

        let config = TriageConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = TriageConfig::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = TriageConfig::load(None).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_env_override_port() {
        std::env::set_var("TRIAGE_PORT", "9999");
        let config = TriageConfig::default().with_env_overrides();
        std::env::remove_var("TRIAGE_PORT");

        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_config_env_invalid_value_ignored() {
        std::env::set_var("TRIAGE_PORT", "not-a-number");
        let config = TriageConfig::default().with_env_overrides();
        std::env::remove_var("TRIAGE_PORT");

        // Should keep default, not crash
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_env_override_store_url() {
        std::env::set_var("TRIAGE_STORE_URL", "https://abc.supabase.co");
        let config = TriageConfig::default().with_env_overrides();
        std::env::remove_var("TRIAGE_STORE_URL");

        assert_eq!(config.store.url, "https://abc.supabase.co");
    }

    #[test]
    fn test_config_validation_zero_port() {
        let mut config = TriageConfig::default();
        config.server.port = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_config_validation_empty_store_url() {
        let mut config = TriageConfig::default();
        config.store.url = String::new();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "store.url"
        ));
    }

    #[test]
    fn test_config_validation_zero_rate_limit() {
        let mut config = TriageConfig::default();
        config.limits.diagnosis.max_requests = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "limits.diagnosis"
        ));
    }

    #[test]
    fn test_config_validation_temperature_range() {
        let mut config = TriageConfig::default();
        config.llm.temperature = 3.5;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "llm.temperature"
        ));
    }
}
