//! Journal repository for posting general journals.
//!
//! A journal header and all of its lines are written in one database
//! transaction. Line and account rules are checked before the transaction
//! begins; reference and reversal uniqueness are checked inside it, and a
//! unique-constraint race on either is mapped back to `DuplicateReference`
//! or `AlreadyReversed` and rolls the whole journal back.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use ledgerline_core::ledger::{
    AccountInfo, JournalLineInput, JournalTotals, LedgerError, LedgerService, PostJournalInput,
    ReversalService,
};
use ledgerline_shared::AppError;
use ledgerline_shared::types::{AccountId, JournalId, JournalLineId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{storage_failure, unique_violation};
use crate::entities::{accounts, general_journals, journal_entry_lines};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// A ledger rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::Database(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Ledger(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Ledger(e) => match &e {
                LedgerError::Validation { field, message } => {
                    Self::field(field.clone(), message.clone())
                }
                LedgerError::AccountNotFound(_)
                | LedgerError::AccountInactive(_)
                | LedgerError::InvalidSubAccount { .. }
                | LedgerError::AmbiguousLine { .. }
                | LedgerError::InsufficientLines { .. }
                | LedgerError::UnbalancedJournal { .. } => Self::Validation {
                    field: e.field(),
                    message: e.to_string(),
                },
                LedgerError::DuplicateReference(_) | LedgerError::AlreadyReversed(_) => {
                    Self::Conflict(e.to_string())
                }
                LedgerError::JournalNotFound(_) => Self::NotFound(e.to_string()),
            },
            JournalError::Database(e) => storage_failure("journal", &e),
        }
    }
}

/// A posted journal with its lines in order.
#[derive(Debug, Clone)]
pub struct JournalWithLines {
    /// The journal header.
    pub journal: general_journals::Model,
    /// Lines ordered by `line_no`.
    pub lines: Vec<journal_entry_lines::Model>,
}

impl JournalWithLines {
    /// Returns the posted lines as line inputs.
    #[must_use]
    pub fn line_inputs(&self) -> Vec<JournalLineInput> {
        self.lines
            .iter()
            .map(|line| JournalLineInput {
                account_id: AccountId::from_uuid(line.account_id),
                sub_account_id: line.sub_account_id.map(AccountId::from_uuid),
                debit: line.debit,
                credit: line.credit,
                description: line.description.clone(),
            })
            .collect()
    }

    /// Returns the rounded totals of the posted lines.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        let debit: Decimal = self.lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = self.lines.iter().map(|l| l.credit).sum();
        JournalTotals::new(debit, credit)
    }
}

/// Filter options for listing journals.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Earliest transaction date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Latest transaction date (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Maximum number of journals to return.
    pub limit: Option<u64>,
}

/// Journal repository for posting and reading general journals.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a balanced general journal.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than two non-blank lines are submitted
    /// - A line is negative or carries both a debit and a credit
    /// - Rounded debits and credits differ
    /// - An account is missing, inactive, or not the parent of the sub-account
    /// - The reference is already used
    /// - Database operation fails (nothing is persisted)
    pub async fn post_journal(
        &self,
        input: PostJournalInput,
    ) -> Result<JournalWithLines, JournalError> {
        self.post(input, None).await
    }

    /// Posts a journal that swaps the debits and credits of `journal_id`.
    ///
    /// # Errors
    ///
    /// Returns `JournalNotFound`, `AlreadyReversed`, or any error of
    /// [`Self::post_journal`].
    pub async fn post_reversal(
        &self,
        journal_id: JournalId,
        transaction_date: NaiveDate,
        reference: Option<String>,
        created_by: Option<UserId>,
    ) -> Result<JournalWithLines, JournalError> {
        let original = self.get_journal(journal_id).await?;

        let input = PostJournalInput {
            transaction_date,
            reference,
            description: Some(ReversalService::reversal_description(
                original.journal.reference.as_deref(),
                original.journal.description.as_deref(),
            )),
            lines: ReversalService::reversing_lines(&original.line_inputs()),
            created_by,
        };

        self.post(input, Some(journal_id)).await
    }

    /// Gets a journal with its lines.
    ///
    /// # Errors
    ///
    /// Returns `JournalNotFound` if the journal does not exist.
    pub async fn get_journal(&self, id: JournalId) -> Result<JournalWithLines, JournalError> {
        let journal = general_journals::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::JournalNotFound(id))?;

        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::JournalId.eq(journal.id))
            .order_by_asc(journal_entry_lines::Column::LineNo)
            .all(&self.db)
            .await?;

        Ok(JournalWithLines { journal, lines })
    }

    /// Lists journal headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_journals(
        &self,
        filter: JournalFilter,
    ) -> Result<Vec<general_journals::Model>, JournalError> {
        let mut query = general_journals::Entity::find();

        if let Some(from) = filter.date_from {
            query = query.filter(general_journals::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(general_journals::Column::TransactionDate.lte(to));
        }

        query = query
            .order_by_desc(general_journals::Column::TransactionDate)
            .order_by_desc(general_journals::Column::CreatedAt)
            .order_by_desc(general_journals::Column::Id);

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        Ok(query.all(&self.db).await?)
    }

    async fn post(
        &self,
        input: PostJournalInput,
        reversal_of: Option<JournalId>,
    ) -> Result<JournalWithLines, JournalError> {
        let accounts = load_account_info(&self.db, &LedgerService::referenced_accounts(&input)).await?;

        let validated =
            match LedgerService::validate_and_resolve(&input, |id| accounts.get(&id).copied()) {
                Ok(validated) => validated,
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), "journal rejected");
                    return Err(e.into());
                }
            };

        let journal_id = JournalId::new();
        let now = Utc::now().into();
        let txn = self.db.begin().await?;

        if let Some(reference) = &validated.reference {
            let taken = general_journals::Entity::find()
                .filter(general_journals::Column::Reference.eq(reference.as_str()))
                .count(&txn)
                .await?;
            if taken > 0 {
                warn!(reference = %reference, "duplicate journal reference");
                return Err(LedgerError::DuplicateReference(reference.clone()).into());
            }
        }

        if let Some(original) = reversal_of {
            let reversed = general_journals::Entity::find()
                .filter(general_journals::Column::ReversalOf.eq(original.into_inner()))
                .count(&txn)
                .await?;
            if reversed > 0 {
                warn!(journal_id = %original, "journal already reversed");
                return Err(LedgerError::AlreadyReversed(original).into());
            }
        }

        let header = general_journals::ActiveModel {
            id: Set(journal_id.into_inner()),
            transaction_date: Set(input.transaction_date),
            reference: Set(validated.reference.clone()),
            description: Set(input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            reversal_of: Set(reversal_of.map(JournalId::into_inner)),
            created_at: Set(now),
        };

        let journal = header.insert(&txn).await.map_err(|e| {
            unique_violation(&e)
                .and_then(|message| {
                    header_conflict(&message, validated.reference.as_deref(), reversal_of)
                })
                .map_or(JournalError::Database(e), JournalError::Ledger)
        })?;

        let mut lines = Vec::with_capacity(validated.lines.len());
        for line in &validated.lines {
            let model = journal_entry_lines::ActiveModel {
                id: Set(JournalLineId::new().into_inner()),
                journal_id: Set(journal.id),
                line_no: Set(line.line_no),
                account_id: Set(line.account_id.into_inner()),
                sub_account_id: Set(line.sub_account_id.map(AccountId::into_inner)),
                debit: Set(line.debit()),
                credit: Set(line.credit()),
                description: Set(line.description.clone()),
                created_at: Set(now),
            };
            lines.push(model.insert(&txn).await?);
        }

        txn.commit().await?;

        info!(
            journal_id = %journal_id,
            reference = validated.reference.as_deref().unwrap_or(""),
            total = %validated.totals.total_debit,
            lines = lines.len(),
            reversal_of = ?reversal_of.map(|id| id.to_string()),
            "journal posted"
        );

        Ok(JournalWithLines { journal, lines })
    }
}

/// Maps a unique violation on a journal header to the rule it enforces.
fn header_conflict(
    message: &str,
    reference: Option<&str>,
    reversal_of: Option<JournalId>,
) -> Option<LedgerError> {
    match (reversal_of, reference) {
        (Some(original), _) if message.contains("reversal_of") => {
            Some(LedgerError::AlreadyReversed(original))
        }
        (_, Some(reference)) if message.contains("reference") => {
            Some(LedgerError::DuplicateReference(reference.to_string()))
        }
        _ => None,
    }
}

/// Loads the posting-relevant facts of the given accounts.
async fn load_account_info<C: ConnectionTrait>(
    conn: &C,
    ids: &[AccountId],
) -> Result<HashMap<AccountId, AccountInfo>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, bool, Option<Uuid>)> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .column(accounts::Column::IsActive)
        .column(accounts::Column::ParentId)
        .filter(accounts::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, is_active, parent_id)| {
            let id = AccountId::from_uuid(id);
            (
                id,
                AccountInfo {
                    id,
                    is_active,
                    parent_id: parent_id.map(AccountId::from_uuid),
                },
            )
        })
        .collect())
}
