//! Property-based tests for stock valuation.

use ledgerline_shared::types::ItemId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::InventoryError;
use super::types::{StockChange, StockLevel};
use super::valuation::{apply_adjustment, apply_purchase, apply_sale, reconcile};

#[derive(Debug, Clone)]
enum Op {
    Purchase(Decimal, Decimal),
    Sale(Decimal, bool),
    Adjustment(Decimal),
}

/// Quantities from 0.01 to 1,000.00.
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Prices from 0.00 to 500.00.
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..50_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (quantity(), price()).prop_map(|(q, p)| Op::Purchase(q, p)),
        (quantity(), any::<bool>()).prop_map(|(q, allow)| Op::Sale(q, allow)),
        (quantity(), any::<bool>()).prop_map(|(q, inward)| Op::Adjustment(if inward { q } else { -q })),
    ]
}

fn run(level: &StockLevel, op: &Op) -> Result<StockChange, InventoryError> {
    match op {
        Op::Purchase(q, p) => apply_purchase(level, *q, *p),
        Op::Sale(q, allow) => apply_sale(level, *q, *allow),
        Op::Adjustment(q) => apply_adjustment(level, *q),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Total value never goes negative and the movement log always
    /// reconciles with the cached aggregates.
    #[test]
    fn prop_log_reconciles_with_aggregates(
        cost in price(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut level = StockLevel { cost, ..StockLevel::default() };
        let mut log = Vec::new();

        for op in &ops {
            match run(&level, op) {
                Ok(change) => {
                    prop_assert!(change.after.total_value >= Decimal::ZERO);
                    log.push((change.quantity, change.value_change));
                    level = change.after;
                }
                Err(InventoryError::InsufficientStock { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
            }
        }

        let report = reconcile(ItemId::new(), &level, log);
        prop_assert!(report.is_consistent(), "drift: {:?}", report);
    }

    /// A rejected sale never changes the level.
    #[test]
    fn prop_rejected_sale_has_no_effect(
        on_hand in quantity(),
        extra in quantity(),
        cost in price(),
    ) {
        let level = StockLevel { on_hand, cost, total_value: on_hand * cost };
        let result = apply_sale(&level, on_hand + extra, false);
        prop_assert!(
            matches!(
                result,
                Err(InventoryError::InsufficientStock { available, required })
                    if available == on_hand && required == on_hand + extra
            ),
            "expected insufficient stock"
        );
    }

    /// Purchases add exactly `quantity * unit_price` (rounded) to the value.
    #[test]
    fn prop_purchase_adds_value(
        q in quantity(),
        p in price(),
    ) {
        let change = apply_purchase(&StockLevel::default(), q, p).unwrap();
        prop_assert_eq!(change.after.on_hand, q);
        prop_assert_eq!(change.value_change, (q * p).round_dp_with_strategy(
            2,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        ));
    }
}
