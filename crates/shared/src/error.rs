//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Domain errors from the ledger, chart of accounts and inventory modules are
/// folded into these kinds at the boundary of the persistence layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input, optionally tied to a single field.
    #[error("Validation error: {message}")]
    Validation {
        /// Field the message applies to, if any.
        field: Option<String>,
        /// Human readable message.
        message: String,
    },

    /// Business rule violation (unbalanced journal, insufficient stock, ...).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (duplicate entry, concurrent modification).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying persistence failed. The message never carries driver detail.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Creates a validation error bound to a field.
    #[must_use]
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a validation error not bound to any field.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation { .. } => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::StorageFailure(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the offending field for validation errors.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
