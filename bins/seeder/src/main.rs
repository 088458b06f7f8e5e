//! Database seeder for Ledgerline development and testing.
//!
//! Runs pending migrations, then seeds a small chart of accounts and a few
//! items. Rows that already exist are left alone, so the seeder can be run
//! repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use ledgerline_core::chart::AccountType;
use ledgerline_core::inventory::{ItemDraft, ItemType};
use ledgerline_db::entities::sea_orm_active_enums::AccountType as DbAccountType;
use ledgerline_db::entities::{accounts, items};
use ledgerline_db::migration::Migrator;
use ledgerline_db::repositories::{AccountRepository, CreateAccountInput, InventoryRepository};
use ledgerline_shared::AppConfig;
use ledgerline_shared::config::{InventoryConfig, LoggingConfig};
use ledgerline_shared::types::AccountId;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A seeded account: type, name, system flag, parent name.
type SeedAccount = (AccountType, &'static str, bool, Option<&'static str>);

const CHART: &[SeedAccount] = &[
    (AccountType::Asset, "Cash", true, None),
    (AccountType::Asset, "Bank", false, None),
    (AccountType::Asset, "Checking", false, Some("Bank")),
    (AccountType::Asset, "Accounts Receivable", true, None),
    (AccountType::Asset, "Inventory Asset", true, None),
    (AccountType::Liability, "Accounts Payable", true, None),
    (AccountType::Liability, "Sales Tax Payable", false, None),
    (AccountType::Equity, "Owner's Equity", true, None),
    (AccountType::Equity, "Retained Earnings", true, None),
    (AccountType::Income, "Sales", true, None),
    (AccountType::Expense, "Cost of Goods Sold", true, None),
    (AccountType::Expense, "Rent", false, None),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let db = ledgerline_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;

    seed_chart(&db).await?;
    seed_items(&db, config.inventory.clone()).await?;

    info!("Seeding complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn find_account(
    db: &DatabaseConnection,
    account_type: AccountType,
    name: &str,
) -> anyhow::Result<Option<accounts::Model>> {
    Ok(accounts::Entity::find()
        .filter(accounts::Column::AccountType.eq(DbAccountType::from(account_type)))
        .filter(accounts::Column::Name.eq(name))
        .one(db)
        .await?)
}

/// Seeds the chart of accounts with generated codes.
async fn seed_chart(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = AccountRepository::new(db.clone());

    for (sort_order, &(account_type, name, is_system, parent)) in (0..).zip(CHART) {
        if find_account(db, account_type, name).await?.is_some() {
            info!(name, "account already exists, skipping");
            continue;
        }

        let parent_id = match parent {
            Some(parent) => find_account(db, account_type, parent)
                .await?
                .map(|p| AccountId::from_uuid(p.id)),
            None => None,
        };

        let code = repo.generate_account_code(account_type).await?;
        let account = repo
            .create_account(CreateAccountInput {
                code,
                name: name.to_string(),
                description: None,
                account_type,
                parent_id,
                is_active: true,
                is_system,
                sort_order,
            })
            .await?;

        info!(code = %account.code, name, "seeded account");
    }

    Ok(())
}

/// Seeds a stocked part, a stocked assembly and a service.
async fn seed_items(db: &DatabaseConnection, config: InventoryConfig) -> anyhow::Result<()> {
    let repo = InventoryRepository::new(db.clone(), config);
    let asset_account = find_account(db, AccountType::Asset, "Inventory Asset")
        .await?
        .map(|a| AccountId::from_uuid(a.id));

    let drafts = [
        ("WID-100", "Widget", ItemType::InventoryPart, dec!(2.50), Some(dec!(10))),
        ("ASM-200", "Widget kit", ItemType::InventoryAssembly, dec!(12.00), Some(dec!(2))),
        ("SVC-300", "Installation", ItemType::Service, dec!(45.00), None),
    ];

    for (sku, name, item_type, cost, reorder_point) in drafts {
        let exists = items::Entity::find()
            .filter(items::Column::Sku.eq(sku))
            .one(db)
            .await?
            .is_some();
        if exists {
            info!(sku, "item already exists, skipping");
            continue;
        }

        let draft = ItemDraft {
            sku: Some(sku.to_string()),
            name: name.to_string(),
            item_type,
            cost,
            reorder_point,
            asset_account_id: asset_account.filter(|_| item_type.is_tracked()),
        };
        repo.create_item(draft).await?;
        info!(sku, name, cost = %cost, "seeded item");
    }

    Ok(())
}
