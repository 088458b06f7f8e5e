//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database with all migrations
//! applied. The pool holds a single connection so the database lives as
//! long as the pool does.

#![allow(dead_code)]

use chrono::NaiveDate;
use ledgerline_core::chart::AccountType;
use ledgerline_db::entities::accounts;
use ledgerline_db::migration::Migrator;
use ledgerline_db::repositories::{AccountRepository, CreateAccountInput};
use ledgerline_shared::types::AccountId;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Opens a fresh migrated database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Input for a plain active account.
pub fn account_input(code: &str, name: &str, account_type: AccountType) -> CreateAccountInput {
    CreateAccountInput {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        account_type,
        parent_id: None,
        is_active: true,
        is_system: false,
        sort_order: 0,
    }
}

/// Creates a plain active account.
pub async fn create_account(
    repo: &AccountRepository,
    code: &str,
    name: &str,
    account_type: AccountType,
) -> accounts::Model {
    repo.create_account(account_input(code, name, account_type))
        .await
        .expect("Failed to create account")
}

/// Creates a sub-account under `parent`.
pub async fn create_sub_account(
    repo: &AccountRepository,
    code: &str,
    name: &str,
    parent: &accounts::Model,
) -> accounts::Model {
    let mut input = account_input(code, name, parent.account_type.into());
    input.parent_id = Some(AccountId::from_uuid(parent.id));
    repo.create_account(input)
        .await
        .expect("Failed to create sub-account")
}

/// Typed id of an account row.
pub fn id_of(account: &accounts::Model) -> AccountId {
    AccountId::from_uuid(account.id)
}

/// A fixed business date.
pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date")
}
