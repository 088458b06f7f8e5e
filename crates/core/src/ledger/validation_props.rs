//! Property-based tests for journal line validation.

use ledgerline_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::JournalLineInput;
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Builds a balanced set of lines: one credit matching all debits.
fn balanced_lines(debits: &[Decimal]) -> Vec<JournalLineInput> {
    let total: Decimal = debits.iter().copied().sum();
    let mut lines: Vec<JournalLineInput> = debits
        .iter()
        .map(|amount| JournalLineInput::debit(AccountId::new(), *amount))
        .collect();
    lines.push(JournalLineInput::credit(AccountId::new(), total));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of debits offset by one equal credit is accepted.
    #[test]
    fn prop_balanced_lines_accepted(
        debits in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let lines = balanced_lines(&debits);
        let (resolved, totals) = validate_lines(&lines).unwrap();

        prop_assert!(totals.is_balanced);
        prop_assert_eq!(resolved.len(), lines.len());
    }

    /// Skewing one amount by at least a cent is always rejected.
    #[test]
    fn prop_skewed_lines_rejected(
        debits in prop::collection::vec(positive_amount(), 1..10),
        skew in positive_amount(),
    ) {
        let mut lines = balanced_lines(&debits);
        lines[0].debit += skew;

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedJournal { .. })),
            "Unbalanced lines should be rejected, got: {:?}",
            result
        );
    }

    /// Blank rows never change the outcome and line numbers stay contiguous.
    #[test]
    fn prop_blank_rows_ignored(
        debits in prop::collection::vec(positive_amount(), 1..6),
        blanks in prop::collection::vec(0usize..8, 0..5),
    ) {
        let mut lines = balanced_lines(&debits);
        let expected = lines.len();
        for position in blanks {
            let at = position.min(lines.len());
            lines.insert(at, JournalLineInput::blank(AccountId::new()));
        }

        let (resolved, _) = validate_lines(&lines).unwrap();
        prop_assert_eq!(resolved.len(), expected);
        for (i, line) in resolved.iter().enumerate() {
            prop_assert_eq!(usize::try_from(line.line_no).unwrap(), i + 1);
        }
    }

    /// A negative amount on any line is rejected with the line's field path.
    #[test]
    fn prop_negative_amount_rejected(
        debits in prop::collection::vec(positive_amount(), 1..6),
        target in 0usize..6,
    ) {
        let mut lines = balanced_lines(&debits);
        let index = target % lines.len();
        lines[index].debit = -lines[index].debit.max(Decimal::ONE);
        lines[index].credit = Decimal::ZERO;

        let expected = format!("lines.{index}.debit");
        let result = validate_lines(&lines);
        prop_assert!(
            matches!(&result, Err(LedgerError::Validation { field, .. }) if *field == expected),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }

    /// Fewer than two non-blank lines are rejected whatever the amounts.
    #[test]
    fn prop_single_line_rejected(
        amount in positive_amount(),
        blank_count in 1usize..4,
    ) {
        let mut lines = vec![JournalLineInput::debit(AccountId::new(), amount)];
        lines.extend((0..blank_count).map(|_| JournalLineInput::blank(AccountId::new())));

        let result = validate_lines(&lines);
        let rejected = matches!(result, Err(LedgerError::InsufficientLines { count: 1 }));
        prop_assert!(rejected);
    }
}
