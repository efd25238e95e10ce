//! Shared types for the text information service
//!
//! This crate defines the pieces used by both halves of the workspace:
//! - Common error type (`TextInfoError`) and `Result` alias
//! - Environment-driven configuration for the HTTP service and for the
//!   Spark client

pub mod config;

pub use config::{AppConfig, ConfigError, DictionaryConfig, ServerConfig, SparkConfig};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Error types shared across the workspace
#[derive(Error, Debug)]
pub enum TextInfoError {
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Spark request failed: {0}")]
    SparkRequest(String),

    /// Unpacking the Spark response failed. Carries the parse detail and the
    /// complete raw body so the caller can see exactly what came back.
    #[error("Failed to parse Spark response: {detail}\nraw response: {raw}")]
    SparkResponse { detail: String, raw: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TextInfoError>;

// ============================================================================
// Tests
// ============================================================================
