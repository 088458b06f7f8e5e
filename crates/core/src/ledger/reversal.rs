//! Reversing journals.
//!
//! Posted journals are never edited. A correction is a new journal whose
//! lines swap debits and credits of the original.

use super::types::JournalLineInput;

/// Stateless service for creating reversing lines.
pub struct ReversalService;

impl ReversalService {
    /// Create reversing lines by swapping debits and credits.
    ///
    /// For each original line:
    /// - Debits become credits
    /// - Credits become debits
    /// - Account, sub-account and description are preserved
    #[must_use]
    pub fn reversing_lines(original: &[JournalLineInput]) -> Vec<JournalLineInput> {
        original
            .iter()
            .map(|line| JournalLineInput {
                debit: line.credit,
                credit: line.debit,
                ..line.clone()
            })
            .collect()
    }

    /// Description for a reversing journal.
    #[must_use]
    pub fn reversal_description(reference: Option<&str>, description: Option<&str>) -> String {
        match (reference, description) {
            (Some(reference), _) => format!("Reversal of {reference}"),
            (None, Some(description)) => format!("Reversal: {description}"),
            (None, None) => "Reversal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntrySide;
    use crate::ledger::validation::validate_lines;
    use ledgerline_shared::types::AccountId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reversing_lines_swap_sides() {
        let (cash, sales) = (AccountId::new(), AccountId::new());
        let original = [
            JournalLineInput::debit(cash, dec!(80)).with_description("Till"),
            JournalLineInput::credit(sales, dec!(80)),
        ];

        let reversed = ReversalService::reversing_lines(&original);
        assert_eq!(reversed.len(), 2);
        assert_eq!(reversed[0].account_id, cash);
        assert_eq!(reversed[0].credit, dec!(80));
        assert_eq!(reversed[0].debit, Decimal::ZERO);
        assert_eq!(reversed[0].description.as_deref(), Some("Till"));
        assert_eq!(reversed[1].debit, dec!(80));

        let (again, totals) = validate_lines(&reversed).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(again[0].side, EntrySide::Credit);
    }

    #[test]
    fn test_reversal_description() {
        assert_eq!(
            ReversalService::reversal_description(Some("JV-7"), Some("Rent")),
            "Reversal of JV-7"
        );
        assert_eq!(
            ReversalService::reversal_description(None, Some("Rent")),
            "Reversal: Rent"
        );
        assert_eq!(ReversalService::reversal_description(None, None), "Reversal");
    }
}
