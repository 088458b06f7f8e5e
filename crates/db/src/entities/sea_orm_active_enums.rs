//! String-backed enums shared by the entities.
//!
//! Each enum mirrors a core domain enum; conversions go both ways so
//! repositories never compare raw strings.

use ledgerline_core::{chart, inventory};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    /// Asset.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income.
    #[sea_orm(string_value = "income")]
    Income,
    /// Expense.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<chart::AccountType> for AccountType {
    fn from(value: chart::AccountType) -> Self {
        match value {
            chart::AccountType::Asset => Self::Asset,
            chart::AccountType::Liability => Self::Liability,
            chart::AccountType::Equity => Self::Equity,
            chart::AccountType::Income => Self::Income,
            chart::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for chart::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

/// Item type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ItemType {
    /// Stocked part.
    #[sea_orm(string_value = "Inventory Part")]
    InventoryPart,
    /// Stocked assembly.
    #[sea_orm(string_value = "Inventory Assembly")]
    InventoryAssembly,
    /// Part that is not stocked.
    #[sea_orm(string_value = "Non-Inventory Part")]
    NonInventoryPart,
    /// Service.
    #[sea_orm(string_value = "Service")]
    Service,
    /// Other charge.
    #[sea_orm(string_value = "Other Charge")]
    OtherCharge,
}

impl From<inventory::ItemType> for ItemType {
    fn from(value: inventory::ItemType) -> Self {
        match value {
            inventory::ItemType::InventoryPart => Self::InventoryPart,
            inventory::ItemType::InventoryAssembly => Self::InventoryAssembly,
            inventory::ItemType::NonInventoryPart => Self::NonInventoryPart,
            inventory::ItemType::Service => Self::Service,
            inventory::ItemType::OtherCharge => Self::OtherCharge,
        }
    }
}

impl From<ItemType> for inventory::ItemType {
    fn from(value: ItemType) -> Self {
        match value {
            ItemType::InventoryPart => Self::InventoryPart,
            ItemType::InventoryAssembly => Self::InventoryAssembly,
            ItemType::NonInventoryPart => Self::NonInventoryPart,
            ItemType::Service => Self::Service,
            ItemType::OtherCharge => Self::OtherCharge,
        }
    }
}

/// Movement type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MovementType {
    /// Purchase.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Sale.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Adjustment.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<inventory::MovementType> for MovementType {
    fn from(value: inventory::MovementType) -> Self {
        match value {
            inventory::MovementType::Purchase => Self::Purchase,
            inventory::MovementType::Sale => Self::Sale,
            inventory::MovementType::Adjustment => Self::Adjustment,
        }
    }
}

impl From<MovementType> for inventory::MovementType {
    fn from(value: MovementType) -> Self {
        match value {
            MovementType::Purchase => Self::Purchase,
            MovementType::Sale => Self::Sale,
            MovementType::Adjustment => Self::Adjustment,
        }
    }
}

/// Source document type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SourceDocumentType {
    /// Customer invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Supplier bill.
    #[sea_orm(string_value = "bill")]
    Bill,
}

impl From<inventory::SourceDocumentType> for SourceDocumentType {
    fn from(value: inventory::SourceDocumentType) -> Self {
        match value {
            inventory::SourceDocumentType::Invoice => Self::Invoice,
            inventory::SourceDocumentType::Bill => Self::Bill,
        }
    }
}

impl From<SourceDocumentType> for inventory::SourceDocumentType {
    fn from(value: SourceDocumentType) -> Self {
        match value {
            SourceDocumentType::Invoice => Self::Invoice,
            SourceDocumentType::Bill => Self::Bill,
        }
    }
}
