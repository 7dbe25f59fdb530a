//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be a finite number, got {actual}")]
    NonFinite { field: String, actual: f64 },

    #[error("Field '{field}' is required")]
    Missing { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a non-finite number validation error.
    pub fn non_finite(field: impl Into<String>, actual: f64) -> Self {
        ValidationError::NonFinite {
            field: field.into(),
            actual,
        }
    }

    /// Creates a missing field validation error.
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::Missing { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::NonFinite { field, .. }
            | ValidationError::Missing { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Checks that a numeric field holds a finite value.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::non_finite(field, value))
    }
}
