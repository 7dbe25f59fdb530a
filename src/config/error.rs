//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Too many retries: {0} (at most {max})", max = super::ai::MAX_RETRIES)]
    TooManyRetries(u32),

    #[error("Currency symbol must not be blank")]
    BlankCurrencySymbol,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
