//! Items and stock movements.

use sea_orm_migration::prelude::*;

use super::amount_column;
use super::m20260301_000001_chart_of_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Items::Sku).string_len(50).unique_key())
                    .col(ColumnDef::new(Items::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Items::ItemType).string_len(32).not_null())
                    .col(amount_column(manager, Items::Cost).not_null().default(0))
                    .col(amount_column(manager, Items::OnHand).not_null().default(0))
                    .col(amount_column(manager, Items::TotalValue).not_null().default(0))
                    .col(amount_column(manager, Items::ReorderPoint))
                    .col(ColumnDef::new(Items::AsOfDate).date())
                    .col(ColumnDef::new(Items::AssetAccountId).uuid())
                    .col(ColumnDef::new(Items::Version).integer().not_null().default(0))
                    .col(ColumnDef::new(Items::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Items::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_asset_account")
                            .from(Items::Table, Items::AssetAccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockMovements::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StockMovements::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(StockMovements::ItemId).uuid().not_null())
                    .col(amount_column(manager, StockMovements::Quantity).not_null())
                    .col(ColumnDef::new(StockMovements::MovementType).string_len(16).not_null())
                    .col(ColumnDef::new(StockMovements::SourceDocumentType).string_len(16))
                    .col(ColumnDef::new(StockMovements::SourceDocumentId).uuid())
                    .col(amount_column(manager, StockMovements::UnitCost).not_null())
                    .col(amount_column(manager, StockMovements::ValueChange).not_null())
                    .col(ColumnDef::new(StockMovements::Reason).text())
                    .col(ColumnDef::new(StockMovements::TransactionDate).date().not_null())
                    .col(ColumnDef::new(StockMovements::Description).text())
                    .col(
                        ColumnDef::new(StockMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_movements_item")
                            .from(StockMovements::Table, StockMovements::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stock_movements_item")
                    .table(StockMovements::Table)
                    .col(StockMovements::ItemId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Sku,
    Name,
    ItemType,
    Cost,
    OnHand,
    TotalValue,
    ReorderPoint,
    AsOfDate,
    AssetAccountId,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StockMovements {
    Table,
    Id,
    ItemId,
    Quantity,
    MovementType,
    SourceDocumentType,
    SourceDocumentId,
    UnitCost,
    ValueChange,
    Reason,
    TransactionDate,
    Description,
    CreatedAt,
}
