//! Stock level arithmetic.
//!
//! Valuation uses the item's current recorded cost: purchases add
//! `quantity * unit_price`, sales and adjustments move value at `cost`.
//! The total value is floored at zero, and the delta actually applied is
//! reported so the movement log always sums to the cached total.

use ledgerline_shared::types::{ItemId, STORED_SCALE, exceeds_stored_scale, round_money};
use rust_decimal::Decimal;

use super::error::InventoryError;
use super::types::{MovementType, Reconciliation, StockChange, StockLevel};

/// Applies a purchase of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns `Validation` if `quantity` is not positive, `unit_price` is
/// negative, or either has more than four decimal places.
pub fn apply_purchase(
    level: &StockLevel,
    quantity: Decimal,
    unit_price: Decimal,
) -> Result<StockChange, InventoryError> {
    require_positive(quantity)?;
    if unit_price < Decimal::ZERO {
        return Err(InventoryError::validation(
            "unit_price",
            "Unit price must not be negative",
        ));
    }
    require_stored_scale("unit_price", unit_price)?;

    Ok(apply(level, MovementType::Purchase, quantity, unit_price))
}

/// Applies a sale of `quantity` units valued at the item's cost.
///
/// # Errors
///
/// Returns `Validation` if `quantity` is not positive, or `InsufficientStock`
/// when `allow_negative` is false and fewer than `quantity` units are on hand.
pub fn apply_sale(
    level: &StockLevel,
    quantity: Decimal,
    allow_negative: bool,
) -> Result<StockChange, InventoryError> {
    require_positive(quantity)?;
    if !allow_negative && level.on_hand < quantity {
        return Err(InventoryError::InsufficientStock {
            available: level.on_hand,
            required: quantity,
        });
    }

    Ok(apply(level, MovementType::Sale, -quantity, level.cost))
}

/// Applies a signed manual adjustment valued at the item's cost.
///
/// # Errors
///
/// Returns `Validation` if `quantity` is zero or has more than four
/// decimal places.
pub fn apply_adjustment(
    level: &StockLevel,
    quantity: Decimal,
) -> Result<StockChange, InventoryError> {
    if quantity.is_zero() {
        return Err(InventoryError::validation(
            "quantity",
            "Adjustment quantity must not be zero",
        ));
    }
    require_stored_scale("quantity", quantity)?;

    Ok(apply(level, MovementType::Adjustment, quantity, level.cost))
}

/// Compares cached aggregates with `(quantity, value_change)` movement pairs.
#[must_use]
pub fn reconcile<I>(item_id: ItemId, level: &StockLevel, movements: I) -> Reconciliation
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let (movement_quantity, movement_value) = movements
        .into_iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(q, v), (dq, dv)| {
            (q + dq, v + dv)
        });

    Reconciliation {
        item_id,
        on_hand: level.on_hand,
        movement_quantity,
        total_value: level.total_value,
        movement_value,
    }
}

fn require_positive(quantity: Decimal) -> Result<(), InventoryError> {
    if quantity <= Decimal::ZERO {
        return Err(InventoryError::validation(
            "quantity",
            "Quantity must be greater than zero",
        ));
    }
    require_stored_scale("quantity", quantity)
}

fn require_stored_scale(field: &'static str, value: Decimal) -> Result<(), InventoryError> {
    if exceeds_stored_scale(value) {
        return Err(InventoryError::validation(
            field,
            format!("Must have at most {STORED_SCALE} decimal places"),
        ));
    }
    Ok(())
}

fn apply(
    level: &StockLevel,
    movement_type: MovementType,
    quantity: Decimal,
    unit_cost: Decimal,
) -> StockChange {
    let requested = round_money(quantity * unit_cost);
    let total_value = (level.total_value + requested).max(Decimal::ZERO);

    StockChange {
        movement_type,
        quantity,
        unit_cost,
        value_change: total_value - level.total_value,
        after: StockLevel {
            on_hand: level.on_hand + quantity,
            cost: level.cost,
            total_value,
        },
    }
}
