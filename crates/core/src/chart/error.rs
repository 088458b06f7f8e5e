//! Chart of accounts error types.

use ledgerline_shared::types::AccountId;
use thiserror::Error;

use super::types::AccountType;

/// Why a proposed parent/child link was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidParentReason {
    /// The parent's type differs from the account's type.
    TypeMismatch {
        /// Type of the account being linked.
        expected: AccountType,
        /// Type of the proposed parent.
        found: AccountType,
    },
    /// The proposed parent is itself a sub-account (max depth is one level).
    ParentIsSubAccount,
    /// The account has sub-accounts of its own and cannot become one.
    AccountHasChildren,
    /// A type change would leave an existing child with a different type.
    ChildTypeMismatch {
        /// The first offending child.
        child_id: AccountId,
    },
}

impl std::fmt::Display for InvalidParentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "parent type {found} does not match account type {expected}")
            }
            Self::ParentIsSubAccount => f.write_str("parent is itself a sub-account"),
            Self::AccountHasChildren => f.write_str("account has sub-accounts"),
            Self::ChildTypeMismatch { child_id } => {
                write!(f, "sub-account {child_id} would no longer share the account type")
            }
        }
    }
}

/// Errors that can occur while maintaining the chart of accounts.
#[derive(Debug, Error)]
pub enum ChartError {
    // ========== Validation Errors ==========
    /// Malformed input for a single field.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Human readable message.
        message: String,
    },

    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    // ========== Lookup Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    // ========== Structural Errors ==========
    /// The proposed parent cannot hold this account.
    #[error("Invalid parent account {parent_id}: {reason}")]
    InvalidParent {
        /// The proposed (or existing) parent account.
        parent_id: AccountId,
        /// Why the link was refused.
        reason: InvalidParentReason,
    },

    /// An account cannot be its own parent.
    #[error("Account {0} cannot be its own parent")]
    SelfParent(AccountId),

    /// The proposed parent descends from the account.
    #[error("Account {parent_id} descends from account {account_id}; linking would create a cycle")]
    CircularRelationship {
        /// The account being updated.
        account_id: AccountId,
        /// The proposed parent.
        parent_id: AccountId,
    },

    // ========== Deletion Guards ==========
    /// Account still has sub-accounts.
    #[error("Cannot delete account {account_id}: it has {count} sub-accounts")]
    HasChildren {
        /// The account.
        account_id: AccountId,
        /// Number of sub-accounts.
        count: u64,
    },

    /// Account is referenced by journal lines or stock movements.
    #[error("Cannot delete account {account_id}: it is referenced by {count} transactions")]
    HasTransactions {
        /// The account.
        account_id: AccountId,
        /// Number of referencing records.
        count: u64,
    },

    /// Account is the inventory asset account of one or more items.
    #[error("Cannot delete account {account_id}: it is the asset account of {count} items")]
    HasItems {
        /// The account.
        account_id: AccountId,
        /// Number of referencing items.
        count: u64,
    },

    /// System accounts are protected.
    #[error("Cannot delete system account {0}")]
    SystemAccount(AccountId),
}

impl ChartError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::InvalidParent { .. } => "INVALID_PARENT",
            Self::SelfParent(_) => "SELF_PARENT",
            Self::CircularRelationship { .. } => "CIRCULAR_RELATIONSHIP",
            Self::HasChildren { .. } => "HAS_CHILDREN",
            Self::HasTransactions { .. } => "HAS_TRANSACTIONS",
            Self::HasItems { .. } => "HAS_ITEMS",
            Self::SystemAccount(_) => "SYSTEM_ACCOUNT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::Validation { .. }
            | Self::ParentNotFound(_)
            | Self::InvalidParent { .. }
            | Self::SelfParent(_)
            | Self::CircularRelationship { .. } => 400,

            // 404 Not Found
            Self::AccountNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateCode(_)
            | Self::HasChildren { .. }
            | Self::HasTransactions { .. }
            | Self::HasItems { .. }
            | Self::SystemAccount(_) => 409,
        }
    }

    /// Returns the field a client should highlight, if any.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::DuplicateCode(_) => Some("code"),
            Self::ParentNotFound(_)
            | Self::InvalidParent { .. }
            | Self::SelfParent(_)
            | Self::CircularRelationship { .. } => Some("parent_id"),
            _ => None,
        }
    }
}
