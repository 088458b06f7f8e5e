//! Ledger service for journal validation and resolution.
//!
//! This module provides the core business logic for validating journals
//! before they are persisted to the database.

use ledgerline_shared::types::AccountId;

use super::error::LedgerError;
use super::types::{AccountInfo, PostJournalInput, ResolvedLine, ValidatedJournal};
use super::validation::validate_lines;

/// Maximum length of a journal reference.
pub const MAX_REFERENCE_LEN: usize = 100;

/// Ledger service for journal validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validate and resolve a journal before persisting.
    ///
    /// This function performs all validation steps:
    /// 1. Normalizes the reference (trimmed, blank becomes `None`)
    /// 2. Validates lines (minimum count, amounts, ambiguity, balance)
    /// 3. Validates accounts and sub-accounts (exist, active, parent link)
    ///
    /// The account lookup is typically backed by a map fetched in one query.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn validate_and_resolve<A>(
        input: &PostJournalInput,
        account_lookup: A,
    ) -> Result<ValidatedJournal, LedgerError>
    where
        A: Fn(AccountId) -> Option<AccountInfo>,
    {
        let reference = Self::normalize_reference(input.reference.as_deref())?;
        let (lines, totals) = validate_lines(&input.lines)?;

        for line in &lines {
            Self::validate_line_accounts(line, &account_lookup)?;
        }

        Ok(ValidatedJournal {
            reference,
            lines,
            totals,
        })
    }

    /// Trims a reference; blank references are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the reference is too long.
    pub fn normalize_reference(reference: Option<&str>) -> Result<Option<String>, LedgerError> {
        let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(None);
        };

        if reference.chars().count() > MAX_REFERENCE_LEN {
            return Err(LedgerError::Validation {
                field: "reference".to_string(),
                message: format!("Reference must be at most {MAX_REFERENCE_LEN} characters"),
            });
        }

        Ok(Some(reference.to_string()))
    }

    /// Returns every account id referenced by `input`, deduplicated.
    #[must_use]
    pub fn referenced_accounts(input: &PostJournalInput) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = input
            .lines
            .iter()
            .flat_map(|l| std::iter::once(l.account_id).chain(l.sub_account_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn validate_line_accounts<A>(line: &ResolvedLine, account_lookup: &A) -> Result<(), LedgerError>
    where
        A: Fn(AccountId) -> Option<AccountInfo>,
    {
        let account = account_lookup(line.account_id)
            .ok_or(LedgerError::AccountNotFound(line.account_id))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(account.id));
        }

        if let Some(sub_account_id) = line.sub_account_id {
            let sub = account_lookup(sub_account_id)
                .ok_or(LedgerError::AccountNotFound(sub_account_id))?;
            if sub.parent_id != Some(account.id) {
                return Err(LedgerError::InvalidSubAccount {
                    account_id: account.id,
                    sub_account_id,
                });
            }
            if !sub.is_active {
                return Err(LedgerError::AccountInactive(sub_account_id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::JournalLineInput;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn make_input(lines: Vec<JournalLineInput>) -> PostJournalInput {
        PostJournalInput {
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            reference: Some("JV-0001".to_string()),
            description: Some("Test journal".to_string()),
            lines,
            created_by: None,
        }
    }

    fn info(id: AccountId) -> AccountInfo {
        AccountInfo {
            id,
            is_active: true,
            parent_id: None,
        }
    }

    fn lookup(accounts: &[AccountInfo]) -> impl Fn(AccountId) -> Option<AccountInfo> + '_ {
        let map: HashMap<AccountId, AccountInfo> = accounts.iter().map(|a| (a.id, *a)).collect();
        move |id| map.get(&id).copied()
    }

    #[test]
    fn test_validate_balanced_journal() {
        let (cash, sales) = (AccountId::new(), AccountId::new());
        let input = make_input(vec![
            JournalLineInput::debit(cash, dec!(100)),
            JournalLineInput::credit(sales, dec!(100)),
        ]);

        let journal =
            LedgerService::validate_and_resolve(&input, lookup(&[info(cash), info(sales)])).unwrap();

        assert_eq!(journal.reference.as_deref(), Some("JV-0001"));
        assert_eq!(journal.lines.len(), 2);
        assert!(journal.totals.is_balanced);
    }

    #[test]
    fn test_validate_unknown_account() {
        let cash = AccountId::new();
        let missing = AccountId::new();
        let input = make_input(vec![
            JournalLineInput::debit(cash, dec!(100)),
            JournalLineInput::credit(missing, dec!(100)),
        ]);

        let result = LedgerService::validate_and_resolve(&input, lookup(&[info(cash)]));
        assert!(matches!(result, Err(LedgerError::AccountNotFound(id)) if id == missing));
    }

    #[test]
    fn test_validate_inactive_account() {
        let (cash, sales) = (AccountId::new(), AccountId::new());
        let input = make_input(vec![
            JournalLineInput::debit(cash, dec!(100)),
            JournalLineInput::credit(sales, dec!(100)),
        ]);
        let inactive = AccountInfo {
            is_active: false,
            ..info(sales)
        };

        let result = LedgerService::validate_and_resolve(&input, lookup(&[info(cash), inactive]));
        assert!(matches!(result, Err(LedgerError::AccountInactive(id)) if id == sales));
    }

    #[test]
    fn test_validate_sub_account_must_be_child() {
        let (cash, bank, stranger) = (AccountId::new(), AccountId::new(), AccountId::new());
        let child = AccountInfo {
            parent_id: Some(cash),
            ..info(bank)
        };
        let accounts = [info(cash), child, info(stranger)];

        let ok = make_input(vec![
            JournalLineInput::debit(cash, dec!(10)).with_sub_account(bank),
            JournalLineInput::credit(stranger, dec!(10)),
        ]);
        assert!(LedgerService::validate_and_resolve(&ok, lookup(&accounts)).is_ok());

        let bad = make_input(vec![
            JournalLineInput::debit(stranger, dec!(10)).with_sub_account(bank),
            JournalLineInput::credit(cash, dec!(10)),
        ]);
        assert!(matches!(
            LedgerService::validate_and_resolve(&bad, lookup(&accounts)),
            Err(LedgerError::InvalidSubAccount { .. })
        ));
    }

    #[test]
    fn test_line_rules_run_before_account_lookup() {
        let input = make_input(vec![JournalLineInput::debit(AccountId::new(), dec!(100))]);
        let result = LedgerService::validate_and_resolve(&input, |_| None);
        assert!(matches!(result, Err(LedgerError::InsufficientLines { count: 1 })));
    }

    #[test]
    fn test_normalize_reference() {
        assert_eq!(LedgerService::normalize_reference(None).unwrap(), None);
        assert_eq!(LedgerService::normalize_reference(Some("   ")).unwrap(), None);
        assert_eq!(
            LedgerService::normalize_reference(Some(" JV-9 ")).unwrap().as_deref(),
            Some("JV-9")
        );
        let long = "x".repeat(MAX_REFERENCE_LEN + 1);
        assert!(matches!(
            LedgerService::normalize_reference(Some(&long)),
            Err(LedgerError::Validation { .. })
        ));
    }

    #[test]
    fn test_referenced_accounts_deduplicated() {
        let (cash, bank) = (AccountId::new(), AccountId::new());
        let input = make_input(vec![
            JournalLineInput::debit(cash, dec!(10)).with_sub_account(bank),
            JournalLineInput::credit(cash, dec!(10)),
        ]);
        let mut ids = LedgerService::referenced_accounts(&input);
        ids.sort_unstable();
        let mut expected = vec![cash, bank];
        expected.sort_unstable();
        assert_eq!(ids, expected);
    }
}
