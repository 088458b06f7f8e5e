//! Inventory valuation error types.

use ledgerline_shared::types::ItemId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while recording stock movements.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Malformed input for a single field.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Human readable message.
        message: String,
    },

    /// A sale exceeds the quantity on hand and negative stock is disallowed.
    #[error("Insufficient stock: available {available}, required {required}")]
    InsufficientStock {
        /// Quantity on hand.
        available: Decimal,
        /// Quantity requested.
        required: Decimal,
    },

    /// Another item already uses this SKU.
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),

    /// Item not found.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Another writer updated the item between read and write.
    #[error("Item {0} was modified concurrently")]
    ConcurrentModification(ItemId),
}

impl InventoryError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::DuplicateSku(_) => "DUPLICATE_SKU",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::ItemNotFound(_) => 404,
            Self::DuplicateSku(_) | Self::ConcurrentModification(_) => 409,
            Self::InsufficientStock { .. } => 422,
        }
    }

    /// Returns true if the operation can be retried as-is.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}
