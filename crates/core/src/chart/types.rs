//! Chart of accounts domain types.

use ledgerline_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ChartError;

/// Maximum length of an account code.
pub const MAX_CODE_LEN: usize = 20;

/// Maximum length of an account name.
pub const MAX_NAME_LEN: usize = 255;

/// Account type classification.
///
/// Each type owns a numeric code block (Asset → 1xxx, Liability → 2xxx, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Resources owned (cash, receivables, inventory).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Revenue earned.
    Income,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All account types, in code block order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Returns the leading digit of this type's account code block.
    #[must_use]
    pub const fn code_prefix(self) -> u32 {
        match self {
            Self::Asset => 1,
            Self::Liability => 2,
            Self::Equity => 3,
            Self::Income => 4,
            Self::Expense => 5,
        }
    }

    /// Returns the side on which this account type normally carries its balance.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalBalance::Credit,
        }
    }

    /// Returns the display name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChartError::Validation {
                field: "type",
                message: format!("Unknown account type: {s}"),
            })
    }
}

/// Side on which an account carries its balance.
///
/// - Asset/Expense: balance = debit - credit (debit-normal)
/// - Liability/Equity/Income: balance = credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Debit-normal accounts.
    Debit,
    /// Credit-normal accounts.
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change for a posting.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// The slice of an account the hierarchy rules need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountNode {
    /// The account ID.
    pub id: AccountId,
    /// The account type.
    pub account_type: AccountType,
    /// The parent account, if this is a sub-account.
    pub parent_id: Option<AccountId>,
}

impl AccountNode {
    /// Returns true if this account has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Field-level input for creating or updating an account.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    /// Account code (unique across the chart).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account for sub-accounts.
    pub parent_id: Option<AccountId>,
}

impl AccountDraft {
    /// Validates the plain fields and returns the trimmed code and name.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::Validation` for a blank or oversized code or name,
    /// or a code containing characters other than ASCII letters, digits, `-` and `.`.
    pub fn normalized(&self) -> Result<(String, String), ChartError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(ChartError::Validation {
                field: "code",
                message: "Account code is required".to_string(),
            });
        }
        if code.len() > MAX_CODE_LEN {
            return Err(ChartError::Validation {
                field: "code",
                message: format!("Account code must be at most {MAX_CODE_LEN} characters"),
            });
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(ChartError::Validation {
                field: "code",
                message: "Account code may only contain letters, digits, '-' and '.'".to_string(),
            });
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ChartError::Validation {
                field: "name",
                message: "Account name is required".to_string(),
            });
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ChartError::Validation {
                field: "name",
                message: format!("Account name must be at most {MAX_NAME_LEN} characters"),
            });
        }

        Ok((code.to_string(), name.to_string()))
    }
}
