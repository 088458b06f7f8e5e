//! Ledger error types for journal posting.
//!
//! This module defines all errors that can occur while posting a journal:
//! line-level validation errors, balance errors, account errors and
//! reference conflicts.

use ledgerline_shared::types::{AccountId, JournalId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Malformed input for a single field.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field (e.g. `lines.2.debit`).
        field: String,
        /// Human readable message.
        message: String,
    },

    /// A line carries both a debit and a credit amount.
    #[error("Line {index} has both a debit and a credit amount")]
    AmbiguousLine {
        /// Index of the line in the submitted input.
        index: usize,
    },

    /// Fewer than two non-blank lines.
    #[error("Journal must have at least 2 non-blank lines, got {count}")]
    InsufficientLines {
        /// Number of non-blank lines.
        count: usize,
    },

    /// Journal is not balanced (debits != credits at two decimals).
    #[error("Journal is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedJournal {
        /// Rounded total debit.
        debit: Decimal,
        /// Rounded total credit.
        credit: Decimal,
    },

    /// Another journal already uses this reference.
    #[error("Journal reference '{0}' already exists")]
    DuplicateReference(String),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// The sub-account is not a child of the line's account.
    #[error("Account {sub_account_id} is not a sub-account of {account_id}")]
    InvalidSubAccount {
        /// The line's account.
        account_id: AccountId,
        /// The submitted sub-account.
        sub_account_id: AccountId,
    },

    // ========== Journal Errors ==========
    /// Journal not found.
    #[error("Journal not found: {0}")]
    JournalNotFound(JournalId),

    /// A reversing journal already exists for this journal.
    #[error("Journal {0} has already been reversed")]
    AlreadyReversed(JournalId),
}

impl LedgerError {
    /// Creates a validation error for a field of line `index`.
    #[must_use]
    pub fn line_field(index: usize, field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: format!("lines.{index}.{field}"),
            message: message.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::AmbiguousLine { .. } => "AMBIGUOUS_LINE",
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::UnbalancedJournal { .. } => "UNBALANCED_JOURNAL",
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::InvalidSubAccount { .. } => "INVALID_SUB_ACCOUNT",
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::Validation { .. }
            | Self::AmbiguousLine { .. }
            | Self::InsufficientLines { .. }
            | Self::UnbalancedJournal { .. }
            | Self::AccountNotFound(_)
            | Self::AccountInactive(_)
            | Self::InvalidSubAccount { .. } => 400,

            // 404 Not Found
            Self::JournalNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateReference(_) | Self::AlreadyReversed(_) => 409,
        }
    }

    /// Returns the field a client should highlight, if any.
    #[must_use]
    pub fn field(&self) -> Option<String> {
        match self {
            Self::Validation { field, .. } => Some(field.clone()),
            Self::AmbiguousLine { index } => Some(format!("lines.{index}")),
            Self::InsufficientLines { .. } | Self::UnbalancedJournal { .. } => {
                Some("lines".to_string())
            }
            Self::DuplicateReference(_) => Some("reference".to_string()),
            Self::AccountNotFound(_) | Self::AccountInactive(_) => Some("account_id".to_string()),
            Self::InvalidSubAccount { .. } => Some("sub_account_id".to_string()),
            Self::JournalNotFound(_) | Self::AlreadyReversed(_) => None,
        }
    }
}
