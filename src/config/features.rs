//! Feature flags configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::costing::DEFAULT_CURRENCY_SYMBOL;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Request AI advisory text for the current scenario
    #[serde(default)]
    pub enable_advisory: bool,

    /// Currency symbol for projects that do not set one
    #[serde(default = "default_currency_symbol")]
    pub default_currency_symbol: String,
}

impl FeatureFlags {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_currency_symbol.trim().is_empty() {
            return Err(ValidationError::BlankCurrencySymbol);
        }
        Ok(())
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_advisory: false,
            default_currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}
