//! Configuration management
//!
//! Everything comes from environment variables with sensible development
//! defaults. Spark credentials have no defaults and must be present in the
//! environment; they are never stored in source.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration for the extraction service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Custom dictionary configuration
    pub dictionary: DictionaryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // Dictionary
        if let Ok(path) = std::env::var("USERDICT_PATH") {
            config.dictionary.path = PathBuf::from(path);
        }

        Ok(config)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Custom dictionary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Path to the user dictionary file. Created with sample entries if it
    /// does not exist at startup.
    pub path: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("userdict.txt"),
        }
    }
}

/// Credentials and tuning for the Spark LLM API
///
/// `SPARK_APP_ID`, `SPARK_API_KEY`, and `SPARK_API_SECRET` are required;
/// the remaining values fall back to the API defaults.
#[derive(Debug, Clone)]
pub struct SparkConfig {
    /// Application ID issued with the API account
    pub app_id: String,

    /// API key (goes into the authorization descriptor)
    pub api_key: String,

    /// API secret (HMAC signing key)
    pub api_secret: String,

    /// Model domain to address
    pub chat_domain: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion token cap
    pub max_tokens: u32,
}

impl SparkConfig {
    /// Load Spark credentials and settings from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            app_id: require_env("SPARK_APP_ID")?,
            api_key: require_env("SPARK_API_KEY")?,
            api_secret: require_env("SPARK_API_SECRET")?,
            chat_domain: "generalv3".to_string(),
            temperature: 0.5,
            max_tokens: 1024,
        };

        if let Ok(domain) = std::env::var("SPARK_CHAT_DOMAIN") {
            config.chat_domain = domain;
        }
        if let Ok(temperature) = std::env::var("SPARK_TEMPERATURE") {
            config.temperature =
                temperature
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "SPARK_TEMPERATURE".to_string(),
                        value: temperature,
                    })?;
        }
        if let Ok(max_tokens) = std::env::var("SPARK_MAX_TOKENS") {
            config.max_tokens = max_tokens.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SPARK_MAX_TOKENS".to_string(),
                value: max_tokens,
            })?;
        }

        Ok(config)
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingRequired(key.to_string()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.dictionary.path, PathBuf::from("userdict.txt"));
    }

    #[test]
    fn test_missing_required_display() {
        let err = ConfigError::MissingRequired("SPARK_APP_ID".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required configuration: SPARK_APP_ID"
        );
    }
}
