//! Inventory domain types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use ledgerline_shared::types::{
    AccountId, BillId, InvoiceId, ItemId, STORED_SCALE, exceeds_stored_scale,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::InventoryError;

/// Maximum length of an item name.
pub const MAX_ITEM_NAME_LEN: usize = 255;

/// Maximum length of a SKU.
pub const MAX_SKU_LEN: usize = 50;

/// Item type.
///
/// Only inventory parts and assemblies carry a stock level; movements
/// recorded against any other type are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// A stocked part.
    #[serde(rename = "Inventory Part")]
    InventoryPart,
    /// A stocked assembly built from parts.
    #[serde(rename = "Inventory Assembly")]
    InventoryAssembly,
    /// A part bought or sold but not stocked.
    #[serde(rename = "Non-Inventory Part")]
    NonInventoryPart,
    /// A service.
    #[serde(rename = "Service")]
    Service,
    /// Freight, fees and similar charges.
    #[serde(rename = "Other Charge")]
    OtherCharge,
}

impl ItemType {
    /// Every item type.
    pub const ALL: [Self; 5] = [
        Self::InventoryPart,
        Self::InventoryAssembly,
        Self::NonInventoryPart,
        Self::Service,
        Self::OtherCharge,
    ];

    /// Returns the display name, also used as the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InventoryPart => "Inventory Part",
            Self::InventoryAssembly => "Inventory Assembly",
            Self::NonInventoryPart => "Non-Inventory Part",
            Self::Service => "Service",
            Self::OtherCharge => "Other Charge",
        }
    }

    /// Returns true if stock movements apply to this type.
    #[must_use]
    pub const fn is_tracked(self) -> bool {
        matches!(self, Self::InventoryPart | Self::InventoryAssembly)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InventoryError::validation("item_type", format!("Unknown item type '{s}'")))
    }
}

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Stock received from a supplier.
    Purchase,
    /// Stock shipped to a customer.
    Sale,
    /// Manual correction.
    Adjustment,
}

impl MovementType {
    /// Returns the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
            Self::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of document a movement originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceDocumentType {
    /// Customer invoice.
    Invoice,
    /// Supplier bill.
    Bill,
}

impl SourceDocumentType {
    /// Returns the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Bill => "bill",
        }
    }
}

/// The document a movement originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum SourceDocument {
    /// Customer invoice.
    Invoice(InvoiceId),
    /// Supplier bill.
    Bill(BillId),
}

impl SourceDocument {
    /// Returns the document type.
    #[must_use]
    pub const fn document_type(&self) -> SourceDocumentType {
        match self {
            Self::Invoice(_) => SourceDocumentType::Invoice,
            Self::Bill(_) => SourceDocumentType::Bill,
        }
    }

    /// Returns the raw document id.
    #[must_use]
    pub fn document_id(&self) -> Uuid {
        match self {
            Self::Invoice(id) => id.into_inner(),
            Self::Bill(id) => id.into_inner(),
        }
    }

    /// Rebuilds a source document from its stored parts.
    ///
    /// Returns `None` unless both parts are present.
    #[must_use]
    pub fn from_parts(document_type: Option<SourceDocumentType>, id: Option<Uuid>) -> Option<Self> {
        match (document_type?, id?) {
            (SourceDocumentType::Invoice, id) => Some(Self::Invoice(InvoiceId::from_uuid(id))),
            (SourceDocumentType::Bill, id) => Some(Self::Bill(BillId::from_uuid(id))),
        }
    }
}

/// The valuation-relevant state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockLevel {
    /// Quantity on hand (may be negative after backorder sales).
    pub on_hand: Decimal,
    /// Recorded unit cost used to value sales and adjustments.
    pub cost: Decimal,
    /// Total value of the stock on hand, never negative.
    pub total_value: Decimal,
}

/// The outcome of applying one movement to a stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Signed quantity delta.
    pub quantity: Decimal,
    /// Unit cost the movement was valued at.
    pub unit_cost: Decimal,
    /// Valuation delta actually applied, after flooring at zero.
    pub value_change: Decimal,
    /// The stock level after the movement.
    pub after: StockLevel,
}

/// Input for recording a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    /// Quantity received, must be positive.
    pub quantity: Decimal,
    /// Price paid per unit, must not be negative.
    pub unit_price: Decimal,
    /// Originating bill.
    pub source: Option<SourceDocument>,
    /// Transaction date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Optional description.
    pub description: Option<String>,
}

/// Input for recording a sale.
#[derive(Debug, Clone)]
pub struct SaleInput {
    /// Quantity shipped, must be positive.
    pub quantity: Decimal,
    /// Originating invoice.
    pub source: Option<SourceDocument>,
    /// Transaction date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Optional description.
    pub description: Option<String>,
    /// Whether on-hand may go negative; `None` uses the configured default.
    pub allow_negative: Option<bool>,
}

/// Input for recording a manual adjustment.
#[derive(Debug, Clone)]
pub struct AdjustmentInput {
    /// Signed quantity delta, must not be zero.
    pub quantity: Decimal,
    /// Free-text reason.
    pub reason: Option<String>,
    /// Transaction date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Optional description.
    pub description: Option<String>,
}

/// Input for creating an item.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    /// Optional stock keeping unit, unique when present.
    pub sku: Option<String>,
    /// Item name.
    pub name: String,
    /// Item type.
    pub item_type: ItemType,
    /// Recorded unit cost.
    pub cost: Decimal,
    /// Reorder threshold.
    pub reorder_point: Option<Decimal>,
    /// Inventory asset account.
    pub asset_account_id: Option<AccountId>,
}

impl ItemDraft {
    /// Validates the draft and returns the trimmed SKU and name.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` for a blank or oversized name, an
    /// oversized SKU, or a negative cost or reorder point.
    pub fn normalized(&self) -> Result<(Option<String>, String), InventoryError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InventoryError::validation("name", "Item name is required"));
        }
        if name.chars().count() > MAX_ITEM_NAME_LEN {
            return Err(InventoryError::validation(
                "name",
                format!("Item name must be at most {MAX_ITEM_NAME_LEN} characters"),
            ));
        }

        let sku = self
            .sku
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(sku) = sku
            && sku.chars().count() > MAX_SKU_LEN
        {
            return Err(InventoryError::validation(
                "sku",
                format!("SKU must be at most {MAX_SKU_LEN} characters"),
            ));
        }

        if self.cost < Decimal::ZERO {
            return Err(InventoryError::validation("cost", "Cost must not be negative"));
        }
        if exceeds_stored_scale(self.cost) {
            return Err(InventoryError::validation(
                "cost",
                format!("Cost must have at most {STORED_SCALE} decimal places"),
            ));
        }
        if self.reorder_point.is_some_and(|r| r < Decimal::ZERO) {
            return Err(InventoryError::validation(
                "reorder_point",
                "Reorder point must not be negative",
            ));
        }

        Ok((sku.map(str::to_string), name.to_string()))
    }
}

/// Comparison of an item's cached aggregates against its movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// The item.
    pub item_id: ItemId,
    /// Quantity on the item row.
    pub on_hand: Decimal,
    /// Sum of movement quantities.
    pub movement_quantity: Decimal,
    /// Value on the item row.
    pub total_value: Decimal,
    /// Sum of movement value changes.
    pub movement_value: Decimal,
}

impl Reconciliation {
    /// Returns true if both aggregates match the movement log.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.on_hand == self.movement_quantity && self.total_value == self.movement_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(ItemType::InventoryPart, true)]
    #[case(ItemType::InventoryAssembly, true)]
    #[case(ItemType::NonInventoryPart, false)]
    #[case(ItemType::Service, false)]
    #[case(ItemType::OtherCharge, false)]
    fn test_item_type_tracking(#[case] item_type: ItemType, #[case] tracked: bool) {
        assert_eq!(item_type.is_tracked(), tracked);
        assert_eq!(item_type.as_str().parse::<ItemType>().unwrap(), item_type);
    }

    #[test]
    fn test_item_type_from_str_rejects_unknown() {
        assert_eq!(
            "inventory part".parse::<ItemType>().unwrap(),
            ItemType::InventoryPart
        );
        assert!(matches!(
            "Gadget".parse::<ItemType>(),
            Err(InventoryError::Validation { field: "item_type", .. })
        ));
    }

    #[test]
    fn test_source_document_parts() {
        let bill = BillId::new();
        let doc = SourceDocument::Bill(bill);
        assert_eq!(doc.document_type(), SourceDocumentType::Bill);
        assert_eq!(
            SourceDocument::from_parts(Some(doc.document_type()), Some(doc.document_id())),
            Some(doc)
        );
        assert_eq!(
            SourceDocument::from_parts(Some(SourceDocumentType::Invoice), None),
            None
        );
        assert_eq!(SourceDocument::from_parts(None, Some(Uuid::nil())), None);
    }

    #[test]
    fn test_source_document_serde_is_tagged() {
        let id = InvoiceId::new();
        let json = serde_json::to_value(SourceDocument::Invoice(id)).unwrap();
        assert_eq!(json["type"], "invoice");
        assert_eq!(json["id"], id.to_string());
    }

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            sku: Some("  WID-1 ".to_string()),
            name: name.to_string(),
            item_type: ItemType::InventoryPart,
            cost: dec!(2.50),
            reorder_point: Some(dec!(5)),
            asset_account_id: None,
        }
    }

    #[test]
    fn test_item_draft_normalized() {
        let (sku, name) = draft(" Widget ").normalized().unwrap();
        assert_eq!(sku.as_deref(), Some("WID-1"));
        assert_eq!(name, "Widget");
    }

    #[test]
    fn test_item_draft_rejects() {
        assert!(matches!(
            draft("  ").normalized(),
            Err(InventoryError::Validation { field: "name", .. })
        ));
        let mut negative = draft("Widget");
        negative.cost = dec!(-1);
        assert!(matches!(
            negative.normalized(),
            Err(InventoryError::Validation { field: "cost", .. })
        ));
        let mut precise = draft("Widget");
        precise.cost = dec!(2.49999);
        assert!(matches!(
            precise.normalized(),
            Err(InventoryError::Validation { field: "cost", .. })
        ));
    }
}
