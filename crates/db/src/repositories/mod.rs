//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod inventory;
pub mod journal;

pub use account::{
    AccountError, AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
pub use inventory::{InventoryRepoError, InventoryRepository};
pub use journal::{JournalError, JournalFilter, JournalRepository, JournalWithLines};

use ledgerline_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Returns true if `err` is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    unique_violation(err).is_some()
}

/// Returns the driver message of a unique constraint violation.
///
/// PostgreSQL names the violated index in the message and SQLite names the
/// column, so callers can tell constraints on the same table apart.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

/// Logs a storage failure and hides its detail from the caller.
pub(crate) fn storage_failure(context: &'static str, err: &DbErr) -> AppError {
    tracing::error!(context, error = %err, "storage failure");
    AppError::StorageFailure(format!("{context} storage failure"))
}
