//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MONARCH` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use monarch::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod features;
mod logging;
mod storage;

pub use ai::{AiConfig, MAX_RETRIES};
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use logging::LoggingConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Project storage backend
    #[serde(default)]
    pub storage: StorageConfig,

    /// AI provider configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MONARCH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MONARCH__STORAGE__BACKEND=file` -> `storage.backend = file`
    /// - `MONARCH__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MONARCH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - the file backend has no data directory
    /// - the AI timeout is zero
    /// - advisory is enabled without a Gemini API key
    /// - the default currency symbol is blank
    /// - the log level is not a valid filter
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.ai.validate(self.features.enable_advisory)?;
        self.features.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Whether advisory requests should be made.
    pub fn advisory_enabled(&self) -> bool {
        self.features.enable_advisory && self.ai.has_gemini()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MONARCH__STORAGE__BACKEND",
        "MONARCH__STORAGE__DATA_DIR",
        "MONARCH__AI__GEMINI_API_KEY",
        "MONARCH__AI__TIMEOUT_SECS",
        "MONARCH__FEATURES__ENABLE_ADVISORY",
        "MONARCH__FEATURES__DEFAULT_CURRENCY_SYMBOL",
        "MONARCH__LOGGING__LEVEL",
        "MONARCH__LOGGING__JSON",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert!(!config.features.enable_advisory);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MONARCH__STORAGE__BACKEND", "file");
        env::set_var("MONARCH__STORAGE__DATA_DIR", "/var/lib/monarch");
        env::set_var("MONARCH__AI__GEMINI_API_KEY", "gm-key");
        env::set_var("MONARCH__AI__TIMEOUT_SECS", "45");
        env::set_var("MONARCH__FEATURES__ENABLE_ADVISORY", "true");
        env::set_var("MONARCH__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/monarch"));
        assert!(config.ai.has_gemini());
        assert_eq!(config.ai.timeout_secs, 45);
        assert!(config.features.enable_advisory);
        assert!(config.logging.json);
        assert!(config.advisory_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_advisory_without_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MONARCH__FEATURES__ENABLE_ADVISORY", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(!config.advisory_enabled());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("GEMINI_API_KEY"))
        );
    }

    #[test]
    fn test_custom_currency_symbol() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MONARCH__FEATURES__DEFAULT_CURRENCY_SYMBOL", "€");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().features.default_currency_symbol, "€");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
