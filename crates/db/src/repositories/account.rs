//! Account repository for chart of accounts database operations.
//!
//! Structural rules (parent type, depth, cycles, deletion guards) live in
//! `ledgerline_core::chart`; this repository loads the facts they need and
//! persists the result.
//!
//! Creates and updates lock the chart rows (`SELECT ... FOR UPDATE`) before
//! validating, and write in the same transaction, so two concurrent parent
//! changes cannot both pass validation against the same snapshot.

use std::collections::HashMap;

use chrono::Utc;
use ledgerline_core::chart::{
    self, AccountDraft, AccountNode, ChartError, ChartGraph, DeletionGuard,
};
use ledgerline_core::ledger::{AccountBalance, TrialBalance};
use ledgerline_shared::AppError;
use ledgerline_shared::types::AccountId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{is_unique_violation, storage_failure};
use crate::entities::sea_orm_active_enums::AccountType as DbAccountType;
use crate::entities::{accounts, items, journal_entry_lines, stock_movements};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A chart of accounts rule was violated.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Chart(e) => e.error_code(),
            Self::Database(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Chart(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Chart(e) => match &e {
                ChartError::Validation { field, message } => Self::field(*field, message.clone()),
                ChartError::AccountNotFound(_) => Self::NotFound(e.to_string()),
                ChartError::DuplicateCode(_)
                | ChartError::HasChildren { .. }
                | ChartError::HasTransactions { .. }
                | ChartError::HasItems { .. }
                | ChartError::SystemAccount(_) => Self::Conflict(e.to_string()),
                ChartError::ParentNotFound(_)
                | ChartError::InvalidParent { .. }
                | ChartError::SelfParent(_)
                | ChartError::CircularRelationship { .. } => Self::field("parent_id", e.to_string()),
            },
            AccountError::Database(e) => storage_failure("account", &e),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account description.
    pub description: Option<String>,
    /// Account type.
    pub account_type: chart::AccountType,
    /// Parent account for a sub-account.
    pub parent_id: Option<AccountId>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the account is protected from deletion.
    pub is_system: bool,
    /// Display order within the chart.
    pub sort_order: i32,
}

/// Input for updating an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Account description.
    pub description: Option<Option<String>>,
    /// Account type (re-validated against parent and children).
    pub account_type: Option<chart::AccountType>,
    /// Parent account.
    pub parent_id: Option<Option<AccountId>>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
    /// Display order.
    pub sort_order: Option<i32>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<chart::AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by parent (`Some(None)` = root accounts only).
    pub parent_id: Option<Option<AccountId>>,
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a malformed code or name, `DuplicateCode`,
    /// `ParentNotFound`, or `InvalidParent` when the parent has another type
    /// or is itself a sub-account.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let draft = AccountDraft {
            code: input.code,
            name: input.name,
            account_type: input.account_type,
            parent_id: input.parent_id,
        };
        let (code, name) = draft.normalized()?;

        let txn = self.db.begin().await?;
        let locked = lock_chart(&txn).await?;
        ensure_code_available(&txn, &code, None).await?;
        chart::validate_create(&graph_of(&locked), input.account_type, input.parent_id)?;

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            code: Set(code.clone()),
            name: Set(name),
            description: Set(trimmed(input.description)),
            account_type: Set(input.account_type.into()),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            is_active: Set(input.is_active),
            is_system: Set(input.is_system),
            sort_order: Set(input.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = account.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                AccountError::Chart(ChartError::DuplicateCode(code.clone()))
            } else {
                AccountError::Database(e)
            }
        })?;
        txn.commit().await?;

        info!(account_id = %model.id, code = %model.code, "account created");
        Ok(model)
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `Validation`, `DuplicateCode`, `SelfParent`,
    /// `ParentNotFound`, `CircularRelationship` or `InvalidParent`.
    pub async fn update_account(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;
        let locked = lock_chart(&txn).await?;
        let existing = locked
            .iter()
            .find(|a| a.id == id.into_inner())
            .cloned()
            .ok_or(ChartError::AccountNotFound(id))?;
        let current_type: chart::AccountType = existing.account_type.into();

        let draft = AccountDraft {
            code: input.code.unwrap_or_else(|| existing.code.clone()),
            name: input.name.unwrap_or_else(|| existing.name.clone()),
            account_type: input.account_type.unwrap_or(current_type),
            parent_id: input
                .parent_id
                .unwrap_or(existing.parent_id.map(AccountId::from_uuid)),
        };
        let (code, name) = draft.normalized()?;

        if code != existing.code {
            ensure_code_available(&txn, &code, Some(id)).await?;
        }

        let graph = graph_of(&locked);
        if let Err(e) = chart::validate_update(&graph, id, draft.account_type, draft.parent_id) {
            warn!(account_id = %id, error = %e, "account update rejected");
            return Err(e.into());
        }

        let mut account: accounts::ActiveModel = existing.into();
        account.code = Set(code.clone());
        account.name = Set(name);
        account.account_type = Set(draft.account_type.into());
        account.parent_id = Set(draft.parent_id.map(AccountId::into_inner));
        if let Some(description) = input.description {
            account.description = Set(trimmed(description));
        }
        if let Some(is_active) = input.is_active {
            account.is_active = Set(is_active);
        }
        if let Some(sort_order) = input.sort_order {
            account.sort_order = Set(sort_order);
        }
        account.updated_at = Set(Utc::now().into());

        let model = account.update(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                AccountError::Chart(ChartError::DuplicateCode(code.clone()))
            } else {
                AccountError::Database(e)
            }
        })?;
        txn.commit().await?;

        info!(account_id = %model.id, "account updated");
        Ok(model)
    }

    /// Deletes an account.
    ///
    /// The guards are checked in order: sub-accounts, then journal lines and
    /// stock movements, then items using it as their asset account, then the
    /// system flag.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `HasChildren`, `HasTransactions`,
    /// `HasItems` or `SystemAccount`.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), AccountError> {
        let txn = self.db.begin().await?;

        let account = accounts::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(ChartError::AccountNotFound(id))?;

        let child_count = accounts::Entity::find()
            .filter(accounts::Column::ParentId.eq(id.into_inner()))
            .count(&txn)
            .await?;

        let transaction_count = count_transactions(&txn, id).await?;

        let item_count = items::Entity::find()
            .filter(items::Column::AssetAccountId.eq(id.into_inner()))
            .count(&txn)
            .await?;

        let guard = DeletionGuard {
            account_id: id,
            is_system: account.is_system,
            child_count,
            transaction_count,
            item_count,
        };
        if let Err(e) = chart::validate_deletion(&guard) {
            warn!(account_id = %id, error = %e, "account deletion rejected");
            return Err(e.into());
        }

        accounts::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(account_id = %id, code = %account.code, "account deleted");
        Ok(())
    }

    /// Returns the next free code in the block of `account_type`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the block is exhausted.
    pub async fn generate_account_code(
        &self,
        account_type: chart::AccountType,
    ) -> Result<String, AccountError> {
        let codes: Vec<String> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Code)
            .filter(accounts::Column::Code.starts_with(account_type.code_prefix().to_string()))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(chart::generate_account_code(
            account_type,
            codes.iter().map(String::as_str),
        )?)
    }

    /// Gets an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub async fn get_account(&self, id: AccountId) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| ChartError::AccountNotFound(id).into())
    }

    /// Lists accounts ordered by sort order, then code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find();

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(DbAccountType::from(account_type)));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }
        match filter.parent_id {
            Some(Some(parent_id)) => {
                query = query.filter(accounts::Column::ParentId.eq(parent_id.into_inner()));
            }
            Some(None) => query = query.filter(accounts::Column::ParentId.is_null()),
            None => {}
        }

        Ok(query
            .order_by_asc(accounts::Column::SortOrder)
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Derives an account balance from posted journal lines.
    ///
    /// Lines count when they post to the account directly or name it as
    /// their sub-account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub async fn account_balance(&self, id: AccountId) -> Result<AccountBalance, AccountError> {
        let account = self.get_account(id).await?;

        let postings: Vec<(Decimal, Decimal)> = journal_entry_lines::Entity::find()
            .select_only()
            .column(journal_entry_lines::Column::Debit)
            .column(journal_entry_lines::Column::Credit)
            .filter(
                journal_entry_lines::Column::AccountId
                    .eq(account.id)
                    .or(journal_entry_lines::Column::SubAccountId.eq(account.id)),
            )
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(AccountBalance::from_postings(
            id,
            account.account_type.into(),
            postings,
        ))
    }

    /// Builds a trial balance over every account, in chart order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trial_balance(&self) -> Result<TrialBalance, AccountError> {
        let accounts = self.list_accounts(AccountFilter::default()).await?;

        let lines: Vec<(Uuid, Decimal, Decimal)> = journal_entry_lines::Entity::find()
            .select_only()
            .column(journal_entry_lines::Column::AccountId)
            .column(journal_entry_lines::Column::Debit)
            .column(journal_entry_lines::Column::Credit)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut by_account: HashMap<Uuid, Vec<(Decimal, Decimal)>> = HashMap::new();
        for (account_id, debit, credit) in lines {
            by_account.entry(account_id).or_default().push((debit, credit));
        }

        let balances = accounts
            .into_iter()
            .map(|account| {
                AccountBalance::from_postings(
                    AccountId::from_uuid(account.id),
                    account.account_type.into(),
                    by_account.remove(&account.id).unwrap_or_default(),
                )
            })
            .collect();

        Ok(TrialBalance::from_balances(balances))
    }
}

/// Locks every account row for the rest of the transaction.
///
/// Rows are locked in id order. SQLite ignores the lock clause and
/// serializes writers instead.
async fn lock_chart<C: ConnectionTrait>(conn: &C) -> Result<Vec<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .order_by_asc(accounts::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await
}

/// Builds the `(id, type, parent)` graph of the chart.
fn graph_of(rows: &[accounts::Model]) -> ChartGraph {
    ChartGraph::from_nodes(rows.iter().map(|a| AccountNode {
        id: AccountId::from_uuid(a.id),
        account_type: a.account_type.into(),
        parent_id: a.parent_id.map(AccountId::from_uuid),
    }))
}

async fn ensure_code_available<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    except: Option<AccountId>,
) -> Result<(), AccountError> {
    let mut query = accounts::Entity::find().filter(accounts::Column::Code.eq(code));
    if let Some(except) = except {
        query = query.filter(accounts::Column::Id.ne(except.into_inner()));
    }

    if query.count(conn).await? > 0 {
        return Err(ChartError::DuplicateCode(code.to_string()).into());
    }
    Ok(())
}

/// Counts journal lines and stock movements that reference the account.
async fn count_transactions<C: ConnectionTrait>(conn: &C, id: AccountId) -> Result<u64, DbErr> {
    let line_count = journal_entry_lines::Entity::find()
        .filter(
            journal_entry_lines::Column::AccountId
                .eq(id.into_inner())
                .or(journal_entry_lines::Column::SubAccountId.eq(id.into_inner())),
        )
        .count(conn)
        .await?;

    let item_ids: Vec<Uuid> = items::Entity::find()
        .select_only()
        .column(items::Column::Id)
        .filter(items::Column::AssetAccountId.eq(id.into_inner()))
        .into_tuple()
        .all(conn)
        .await?;

    let movement_count = if item_ids.is_empty() {
        0
    } else {
        stock_movements::Entity::find()
            .filter(stock_movements::Column::ItemId.is_in(item_ids))
            .count(conn)
            .await?
    };

    Ok(line_count + movement_count)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
