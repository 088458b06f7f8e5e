//! Inventory repository for stock movements and item valuation.
//!
//! Each recording reads the item, computes the new stock level with
//! `ledgerline_core::inventory`, then updates the item and appends the
//! movement in one transaction. The item update is guarded by its `version`
//! column; losing the race yields `ConcurrentModification`, which is retried
//! up to `InventoryConfig::max_retries` times.

use std::future::Future;

use chrono::{NaiveDate, Utc};
use ledgerline_core::inventory::{
    self, AdjustmentInput, InventoryError, ItemDraft, PurchaseInput, Reconciliation, SaleInput,
    SourceDocument, StockChange, StockLevel,
};
use ledgerline_shared::AppError;
use ledgerline_shared::config::InventoryConfig;
use ledgerline_shared::types::{AccountId, ItemId, StockMovementId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

use super::{is_unique_violation, storage_failure};
use crate::entities::sea_orm_active_enums::ItemType as DbItemType;
use crate::entities::{accounts, items, stock_movements};

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryRepoError {
    /// An inventory rule was violated.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl InventoryRepoError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Inventory(e) => e.error_code(),
            Self::Database(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Inventory(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the operation can be retried as-is.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Inventory(e) if e.is_retryable())
    }
}

impl From<InventoryRepoError> for AppError {
    fn from(err: InventoryRepoError) -> Self {
        match err {
            InventoryRepoError::Inventory(e) => match &e {
                InventoryError::Validation { field, message } => {
                    Self::field(*field, message.clone())
                }
                InventoryError::InsufficientStock { .. } => Self::BusinessRule(e.to_string()),
                InventoryError::DuplicateSku(_) | InventoryError::ConcurrentModification(_) => {
                    Self::Conflict(e.to_string())
                }
                InventoryError::ItemNotFound(_) => Self::NotFound(e.to_string()),
            },
            InventoryRepoError::Database(e) => storage_failure("inventory", &e),
        }
    }
}

/// One pending stock movement.
#[derive(Debug, Clone, Copy)]
enum Movement<'a> {
    Purchase(&'a PurchaseInput),
    Sale(&'a SaleInput, bool),
    Adjustment(&'a AdjustmentInput),
}

impl Movement<'_> {
    fn apply(&self, level: &StockLevel) -> Result<StockChange, InventoryError> {
        match self {
            Self::Purchase(input) => {
                inventory::apply_purchase(level, input.quantity, input.unit_price)
            }
            Self::Sale(input, allow_negative) => {
                inventory::apply_sale(level, input.quantity, *allow_negative)
            }
            Self::Adjustment(input) => inventory::apply_adjustment(level, input.quantity),
        }
    }

    fn source(&self) -> Option<SourceDocument> {
        match self {
            Self::Purchase(input) => input.source,
            Self::Sale(input, _) => input.source,
            Self::Adjustment(_) => None,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Purchase(input) => input.date,
            Self::Sale(input, _) => input.date,
            Self::Adjustment(input) => input.date,
        }
    }

    fn description(&self) -> Option<String> {
        let description = match self {
            Self::Purchase(input) => input.description.as_deref(),
            Self::Sale(input, _) => input.description.as_deref(),
            Self::Adjustment(input) => input.description.as_deref(),
        };
        trimmed(description)
    }

    fn reason(&self) -> Option<String> {
        match self {
            Self::Adjustment(input) => trimmed(input.reason.as_deref()),
            _ => None,
        }
    }
}

/// Inventory repository for item valuation.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
    config: InventoryConfig,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: InventoryConfig) -> Self {
        Self { db, config }
    }

    /// Creates an item with zero stock.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for malformed fields or an unknown asset account,
    /// or `DuplicateSku`.
    pub async fn create_item(&self, draft: ItemDraft) -> Result<items::Model, InventoryRepoError> {
        let (sku, name) = draft.normalized()?;

        if let Some(sku) = &sku {
            let taken = items::Entity::find()
                .filter(items::Column::Sku.eq(sku.as_str()))
                .count(&self.db)
                .await?;
            if taken > 0 {
                return Err(InventoryError::DuplicateSku(sku.clone()).into());
            }
        }

        if let Some(account_id) = draft.asset_account_id {
            let exists = accounts::Entity::find_by_id(account_id.into_inner())
                .count(&self.db)
                .await?
                > 0;
            if !exists {
                return Err(InventoryError::validation(
                    "asset_account_id",
                    format!("Account {account_id} does not exist"),
                )
                .into());
            }
        }

        let now = Utc::now().into();
        let item = items::ActiveModel {
            id: Set(ItemId::new().into_inner()),
            sku: Set(sku.clone()),
            name: Set(name),
            item_type: Set(draft.item_type.into()),
            cost: Set(draft.cost),
            on_hand: Set(Decimal::ZERO),
            total_value: Set(Decimal::ZERO),
            reorder_point: Set(draft.reorder_point),
            as_of_date: Set(None),
            asset_account_id: Set(draft.asset_account_id.map(AccountId::into_inner)),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = item.insert(&self.db).await.map_err(|e| match &sku {
            Some(sku) if is_unique_violation(&e) => {
                InventoryRepoError::Inventory(InventoryError::DuplicateSku(sku.clone()))
            }
            _ => InventoryRepoError::Database(e),
        })?;

        info!(item_id = %model.id, item_type = %draft.item_type, "item created");
        Ok(model)
    }

    /// Gets an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    pub async fn get_item(&self, id: ItemId) -> Result<items::Model, InventoryRepoError> {
        items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| InventoryError::ItemNotFound(id).into())
    }

    /// Records a purchase: stock goes up by `quantity`, value by
    /// `quantity * unit_price`. The recorded cost is left unchanged.
    ///
    /// Returns `Ok(None)` without changes for untracked item types.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound`, `Validation`, or `ConcurrentModification` once
    /// the retries are exhausted.
    pub async fn record_purchase(
        &self,
        item_id: ItemId,
        input: PurchaseInput,
    ) -> Result<Option<stock_movements::Model>, InventoryRepoError> {
        self.record(item_id, Movement::Purchase(&input)).await
    }

    /// Records a sale valued at the item's recorded cost, flooring the total
    /// value at zero.
    ///
    /// `input.allow_negative` falls back to the configured policy.
    ///
    /// Returns `Ok(None)` without changes for untracked item types.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound`, `Validation`, `InsufficientStock`, or
    /// `ConcurrentModification` once the retries are exhausted.
    pub async fn record_sale(
        &self,
        item_id: ItemId,
        input: SaleInput,
    ) -> Result<Option<stock_movements::Model>, InventoryRepoError> {
        let allow_negative = input
            .allow_negative
            .unwrap_or(self.config.allow_negative_stock);
        self.record(item_id, Movement::Sale(&input, allow_negative))
            .await
    }

    /// Records a signed manual adjustment valued at the item's recorded cost.
    ///
    /// Returns `Ok(None)` without changes for untracked item types.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound`, `Validation`, or `ConcurrentModification` once
    /// the retries are exhausted.
    pub async fn record_adjustment(
        &self,
        item_id: ItemId,
        input: AdjustmentInput,
    ) -> Result<Option<stock_movements::Model>, InventoryRepoError> {
        self.record(item_id, Movement::Adjustment(&input)).await
    }

    /// Returns the movements of an item, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    pub async fn item_movements(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<stock_movements::Model>, InventoryRepoError> {
        let item = self.get_item(item_id).await?;

        Ok(stock_movements::Entity::find()
            .filter(stock_movements::Column::ItemId.eq(item.id))
            .order_by_asc(stock_movements::Column::CreatedAt)
            .order_by_asc(stock_movements::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Compares the item's cached on-hand and value with its movement log.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    pub async fn reconcile_item(
        &self,
        item_id: ItemId,
    ) -> Result<Reconciliation, InventoryRepoError> {
        let item = self.get_item(item_id).await?;

        let movements: Vec<(Decimal, Decimal)> = stock_movements::Entity::find()
            .select_only()
            .column(stock_movements::Column::Quantity)
            .column(stock_movements::Column::ValueChange)
            .filter(stock_movements::Column::ItemId.eq(item.id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let report = inventory::reconcile(item_id, &stock_level(&item), movements);
        if !report.is_consistent() {
            warn!(
                item_id = %item_id,
                on_hand = %report.on_hand,
                movement_quantity = %report.movement_quantity,
                total_value = %report.total_value,
                movement_value = %report.movement_value,
                "item does not reconcile with its movements"
            );
        }
        Ok(report)
    }

    /// Lists tracked items whose on-hand quantity is at or below their
    /// reorder point.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn items_below_reorder_point(&self) -> Result<Vec<items::Model>, InventoryRepoError> {
        let candidates = items::Entity::find()
            .filter(
                items::Column::ItemType
                    .is_in([DbItemType::InventoryPart, DbItemType::InventoryAssembly]),
            )
            .filter(items::Column::ReorderPoint.is_not_null())
            .order_by_asc(items::Column::Name)
            .all(&self.db)
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|item| item.reorder_point.is_some_and(|point| item.on_hand <= point))
            .collect())
    }

    async fn record(
        &self,
        item_id: ItemId,
        movement: Movement<'_>,
    ) -> Result<Option<stock_movements::Model>, InventoryRepoError> {
        with_retry(self.config.max_retries, || self.try_record(item_id, movement)).await
    }

    async fn try_record(
        &self,
        item_id: ItemId,
        movement: Movement<'_>,
    ) -> Result<Option<stock_movements::Model>, InventoryRepoError> {
        let txn = self.db.begin().await?;

        let item = items::Entity::find_by_id(item_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(InventoryError::ItemNotFound(item_id))?;

        let item_type: inventory::ItemType = item.item_type.into();
        if !item_type.is_tracked() {
            debug!(item_id = %item_id, item_type = %item_type, "untracked item, movement ignored");
            return Ok(None);
        }

        let change = match movement.apply(&stock_level(&item)) {
            Ok(change) => change,
            Err(e) => {
                warn!(item_id = %item_id, error = %e, "stock movement rejected");
                return Err(e.into());
            }
        };

        let record = persist(&txn, &item, &change, movement).await?;
        txn.commit().await?;

        info!(
            item_id = %item_id,
            movement = %change.movement_type,
            quantity = %change.quantity,
            on_hand = %change.after.on_hand,
            total_value = %change.after.total_value,
            "stock movement recorded"
        );

        Ok(Some(record))
    }
}

/// Writes `change` over `item` and appends its movement.
///
/// The item update only matches the version that was read; a newer version
/// means another writer got there first and nothing is written.
async fn persist<C: ConnectionTrait>(
    conn: &C,
    item: &items::Model,
    change: &StockChange,
    movement: Movement<'_>,
) -> Result<stock_movements::Model, InventoryRepoError> {
    let date = movement.date().unwrap_or_else(|| Utc::now().date_naive());
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

    let updated = items::Entity::update_many()
        .col_expr(items::Column::OnHand, Expr::value(change.after.on_hand))
        .col_expr(items::Column::TotalValue, Expr::value(change.after.total_value))
        .col_expr(items::Column::AsOfDate, Expr::value(date))
        .col_expr(items::Column::Version, Expr::value(item.version + 1))
        .col_expr(items::Column::UpdatedAt, Expr::value(now))
        .filter(items::Column::Id.eq(item.id))
        .filter(items::Column::Version.eq(item.version))
        .exec(conn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(InventoryError::ConcurrentModification(ItemId::from_uuid(item.id)).into());
    }

    let source = movement.source();
    let record = stock_movements::ActiveModel {
        id: Set(StockMovementId::new().into_inner()),
        item_id: Set(item.id),
        quantity: Set(change.quantity),
        movement_type: Set(change.movement_type.into()),
        source_document_type: Set(source.map(|s| s.document_type().into())),
        source_document_id: Set(source.map(|s| s.document_id())),
        unit_cost: Set(change.unit_cost),
        value_change: Set(change.value_change),
        reason: Set(movement.reason()),
        transaction_date: Set(date),
        description: Set(movement.description()),
        created_at: Set(now),
    };
    Ok(record.insert(conn).await?)
}

/// Runs `operation`, retrying retryable failures up to `max_retries` times.
async fn with_retry<T, F, Fut>(max_retries: u32, mut operation: F) -> Result<T, InventoryRepoError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, InventoryRepoError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                warn!(attempt, max_retries, error = %e, "retrying stock movement");
            }
            result => return result,
        }
    }
}

fn stock_level(item: &items::Model) -> StockLevel {
    StockLevel {
        on_hand: item.on_hand,
        cost: item.cost,
        total_value: item.total_value,
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Rebuilds the source document of a stored movement.
#[must_use]
pub fn movement_source(movement: &stock_movements::Model) -> Option<SourceDocument> {
    SourceDocument::from_parts(
        movement.source_document_type.map(Into::into),
        movement.source_document_id,
    )
}
