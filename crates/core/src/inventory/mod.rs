//! Inventory valuation.
//!
//! Tracks on-hand quantity and total value for stocked items. Only
//! [`ItemType::is_tracked`] types participate.

pub mod error;
pub mod types;
pub mod valuation;

#[cfg(test)]
mod valuation_props;

pub use error::InventoryError;
pub use types::{
    AdjustmentInput, ItemDraft, ItemType, MovementType, PurchaseInput, Reconciliation, SaleInput,
    SourceDocument, SourceDocumentType, StockChange, StockLevel,
};
pub use valuation::{apply_adjustment, apply_purchase, apply_sale, reconcile};
