//! Ledger domain types for journal posting and validation.
//!
//! This module defines the core types used for posting balanced
//! general journals in the double-entry bookkeeping system.

use chrono::NaiveDate;
use ledgerline_shared::types::{AccountId, UserId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry side: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/income accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/income accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntrySide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// A journal line as submitted by an entry form.
///
/// Both amounts are present; a zero means "not filled in". A line with both
/// amounts zero is a blank row and is dropped before balancing.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Optional sub-account of `account_id`.
    pub sub_account_id: Option<AccountId>,
    /// Debit amount (zero when the line is a credit).
    pub debit: Decimal,
    /// Credit amount (zero when the line is a debit).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            sub_account_id: None,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            sub_account_id: None,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Creates a blank row (both amounts zero).
    #[must_use]
    pub fn blank(account_id: AccountId) -> Self {
        Self::debit(account_id, Decimal::ZERO)
    }

    /// Sets the sub-account.
    #[must_use]
    pub fn with_sub_account(mut self, sub_account_id: AccountId) -> Self {
        self.sub_account_id = Some(sub_account_id);
        self
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if neither amount is filled in.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }
}

/// Input for posting a general journal.
#[derive(Debug, Clone)]
pub struct PostJournalInput {
    /// The date of the transaction.
    pub transaction_date: NaiveDate,
    /// Optional reference number (unique across journals).
    pub reference: Option<String>,
    /// Optional description of the journal.
    pub description: Option<String>,
    /// The submitted lines (at least 2 must survive blank-row removal).
    pub lines: Vec<JournalLineInput>,
    /// The user posting the journal.
    pub created_by: Option<UserId>,
}

/// A line that survived validation, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    /// Position of the line in the posted journal (1-based, no gaps).
    pub line_no: i32,
    /// Index of the line in the submitted input.
    pub source_index: usize,
    /// The account to post to.
    pub account_id: AccountId,
    /// Optional sub-account.
    pub sub_account_id: Option<AccountId>,
    /// Debit or credit.
    pub side: EntrySide,
    /// The positive amount on `side`.
    pub amount: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl ResolvedLine {
    /// Debit amount (zero for credit lines).
    #[must_use]
    pub fn debit(&self) -> Decimal {
        match self.side {
            EntrySide::Debit => self.amount,
            EntrySide::Credit => Decimal::ZERO,
        }
    }

    /// Credit amount (zero for debit lines).
    #[must_use]
    pub fn credit(&self) -> Decimal {
        match self.side {
            EntrySide::Debit => Decimal::ZERO,
            EntrySide::Credit => self.amount,
        }
    }
}

/// Journal totals for validation and display.
///
/// Totals are rounded to two decimal places before they are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalTotals {
    /// Rounded sum of debits.
    pub total_debit: Decimal,
    /// Rounded sum of credits.
    pub total_credit: Decimal,
    /// Whether the journal is balanced (rounded debits == rounded credits).
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates totals from raw debit and credit sums.
    #[must_use]
    pub fn new(raw_debit: Decimal, raw_credit: Decimal) -> Self {
        let total_debit = round_money(raw_debit);
        let total_credit = round_money(raw_credit);
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// A journal that passed every line-level rule.
#[derive(Debug, Clone)]
pub struct ValidatedJournal {
    /// Trimmed reference, `None` when blank.
    pub reference: Option<String>,
    /// Surviving lines in submission order.
    pub lines: Vec<ResolvedLine>,
    /// Balanced totals.
    pub totals: JournalTotals,
}

/// Information about an account needed for line validation.
#[derive(Debug, Clone, Copy)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account is active.
    pub is_active: bool,
    /// The parent account, for sub-account checks.
    pub parent_id: Option<AccountId>,
}
