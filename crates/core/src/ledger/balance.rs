//! Account balance calculations.
//!
//! Balances are never stored: they are derived by aggregating posted journal
//! lines, so the journal line table stays the only source of truth.

use ledgerline_shared::types::{AccountId, round_money, rounded_sum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chart::AccountType;

/// Account balance derived from journal lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// The account type (decides the normal balance side).
    pub account_type: AccountType,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Net balance on the account's normal side.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates a zero balance.
    #[must_use]
    pub fn new(account_id: AccountId, account_type: AccountType) -> Self {
        Self {
            account_id,
            account_type,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Aggregates `(debit, credit)` postings into a balance.
    #[must_use]
    pub fn from_postings<I>(account_id: AccountId, account_type: AccountType, postings: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, Decimal)>,
    {
        let mut balance = Self::new(account_id, account_type);
        for (debit, credit) in postings {
            balance.post(debit, credit);
        }
        balance
    }

    /// Applies one posting.
    pub fn post(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
        self.balance = round_money(
            self.account_type
                .normal_balance()
                .balance_change(self.debit_total, self.credit_total),
        );
    }
}

/// Trial balance over a set of accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Per-account balances.
    pub accounts: Vec<AccountBalance>,
    /// Sum of every account's debit total.
    pub total_debit: Decimal,
    /// Sum of every account's credit total.
    pub total_credit: Decimal,
}

impl TrialBalance {
    /// Builds a trial balance from account balances.
    #[must_use]
    pub fn from_balances(accounts: Vec<AccountBalance>) -> Self {
        let total_debit = rounded_sum(accounts.iter().map(|a| a.debit_total));
        let total_credit = rounded_sum(accounts.iter().map(|a| a.credit_total));
        Self {
            accounts,
            total_debit,
            total_credit,
        }
    }

    /// Returns true if total debits equal total credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }
}
