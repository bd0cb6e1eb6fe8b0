//! Error types for Sensiscan Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    // Rule management errors
    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
