//! Business rule validation for journal lines.

use ledgerline_shared::types::{STORED_SCALE, exceeds_stored_scale};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntrySide, JournalLineInput, JournalTotals, ResolvedLine};

/// Minimum number of non-blank lines in a journal.
pub const MIN_LINES: usize = 2;

/// Validates submitted lines and resolves the non-blank ones.
///
/// Rules, in order:
/// 1. At least [`MIN_LINES`] lines must be submitted.
/// 2. No amount may be negative or carry more than [`STORED_SCALE`]
///    decimal places.
/// 3. A line may not carry both a debit and a credit.
/// 4. Blank lines (both amounts zero) are dropped.
/// 5. At least [`MIN_LINES`] lines must remain.
/// 6. Rounded total debits must equal rounded total credits.
///
/// # Errors
///
/// Returns `InsufficientLines`, `Validation`, `AmbiguousLine` or
/// `UnbalancedJournal`.
pub fn validate_lines(
    lines: &[JournalLineInput],
) -> Result<(Vec<ResolvedLine>, JournalTotals), LedgerError> {
    if lines.len() < MIN_LINES {
        return Err(LedgerError::InsufficientLines { count: lines.len() });
    }

    let mut resolved = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        if line.debit < Decimal::ZERO {
            return Err(LedgerError::line_field(index, "debit", "Amount must not be negative"));
        }
        if line.credit < Decimal::ZERO {
            return Err(LedgerError::line_field(index, "credit", "Amount must not be negative"));
        }
        for (field, amount) in [("debit", line.debit), ("credit", line.credit)] {
            if exceeds_stored_scale(amount) {
                return Err(LedgerError::line_field(
                    index,
                    field,
                    format!("Amount must have at most {STORED_SCALE} decimal places"),
                ));
            }
        }
        if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
            return Err(LedgerError::AmbiguousLine { index });
        }
        if line.is_blank() {
            continue;
        }

        let (side, amount) = if line.debit > Decimal::ZERO {
            (EntrySide::Debit, line.debit)
        } else {
            (EntrySide::Credit, line.credit)
        };

        resolved.push(ResolvedLine {
            line_no: 0,
            source_index: index,
            account_id: line.account_id,
            sub_account_id: line.sub_account_id,
            side,
            amount,
            description: line
                .description
                .as_ref()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        });
    }

    if resolved.len() < MIN_LINES {
        return Err(LedgerError::InsufficientLines {
            count: resolved.len(),
        });
    }

    for (position, line) in (1..).zip(resolved.iter_mut()) {
        line.line_no = position;
    }

    let totals = calculate_totals(&resolved);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedJournal {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok((resolved, totals))
}

/// Calculates rounded totals for resolved lines.
#[must_use]
pub fn calculate_totals(lines: &[ResolvedLine]) -> JournalTotals {
    let debit: Decimal = lines.iter().map(ResolvedLine::debit).sum();
    let credit: Decimal = lines.iter().map(ResolvedLine::credit).sum();
    JournalTotals::new(debit, credit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_shared::types::AccountId;
    use rust_decimal_macros::dec;

    fn debit(amount: Decimal) -> JournalLineInput {
        JournalLineInput::debit(AccountId::new(), amount)
    }

    fn credit(amount: Decimal) -> JournalLineInput {
        JournalLineInput::credit(AccountId::new(), amount)
    }

    #[test]
    fn test_balanced_lines() {
        let (lines, totals) = validate_lines(&[debit(dec!(100)), credit(dec!(100))]).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(lines[0].side, EntrySide::Debit);
        assert_eq!(lines[1].side, EntrySide::Credit);
    }

    #[test]
    fn test_unbalanced_lines() {
        let result = validate_lines(&[debit(dec!(100)), credit(dec!(50))]);
        assert!(matches!(
            result,
            Err(LedgerError::UnbalancedJournal { debit, credit })
                if debit == dec!(100) && credit == dec!(50)
        ));
    }

    #[test]
    fn test_single_line() {
        let result = validate_lines(&[debit(dec!(100))]);
        assert!(matches!(result, Err(LedgerError::InsufficientLines { count: 1 })));
    }

    #[test]
    fn test_no_lines() {
        assert!(matches!(
            validate_lines(&[]),
            Err(LedgerError::InsufficientLines { count: 0 })
        ));
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let blank = JournalLineInput::blank(AccountId::new());
        let (lines, _) = validate_lines(&[
            debit(dec!(40)),
            blank.clone(),
            credit(dec!(40)),
            blank,
        ])
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_no, 1);
        assert_eq!(lines[1].line_no, 2);
        assert_eq!(lines[1].source_index, 2);
    }

    #[test]
    fn test_blank_rows_do_not_count_towards_minimum() {
        let blank = JournalLineInput::blank(AccountId::new());
        let result = validate_lines(&[debit(dec!(40)), blank.clone(), blank]);
        assert!(matches!(result, Err(LedgerError::InsufficientLines { count: 1 })));
    }

    #[test]
    fn test_ambiguous_line() {
        let mut both = debit(dec!(10));
        both.credit = dec!(10);
        let result = validate_lines(&[credit(dec!(5)), both, debit(dec!(5))]);
        assert!(matches!(result, Err(LedgerError::AmbiguousLine { index: 1 })));
    }

    #[test]
    fn test_negative_amount() {
        let result = validate_lines(&[debit(dec!(-10)), credit(dec!(-10))]);
        assert!(matches!(
            result,
            Err(LedgerError::Validation { ref field, .. }) if field == "lines.0.debit"
        ));
    }

    #[test]
    fn test_amount_scale_limit() {
        let result = validate_lines(&[debit(dec!(0.00004)), debit(dec!(1)), credit(dec!(1))]);
        assert!(matches!(
            result,
            Err(LedgerError::Validation { ref field, .. }) if field == "lines.0.debit"
        ));

        let result =
            validate_lines(&[debit(dec!(5)), credit(dec!(4.99995)), credit(dec!(0.00005))]);
        assert!(matches!(
            result,
            Err(LedgerError::Validation { ref field, .. }) if field == "lines.1.credit"
        ));

        let (lines, totals) =
            validate_lines(&[debit(dec!(2.12340000)), credit(dec!(2.1234))]).unwrap();
        assert_eq!(lines[0].amount, dec!(2.1234));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_rounding_before_comparison() {
        let (_, totals) = validate_lines(&[
            debit(dec!(33.333)),
            debit(dec!(33.333)),
            credit(dec!(66.67)),
        ])
        .unwrap();
        assert_eq!(totals.total_debit, dec!(66.67));
    }

    #[test]
    fn test_no_tolerance_band() {
        let result = validate_lines(&[debit(dec!(100.00)), credit(dec!(100.01))]);
        assert!(matches!(result, Err(LedgerError::UnbalancedJournal { .. })));
    }

    #[test]
    fn test_line_description_trimmed() {
        let (lines, _) = validate_lines(&[
            debit(dec!(1)).with_description("  Office chairs "),
            credit(dec!(1)).with_description("   "),
        ])
        .unwrap();
        assert_eq!(lines[0].description.as_deref(), Some("Office chairs"));
        assert_eq!(lines[1].description, None);
    }
}
