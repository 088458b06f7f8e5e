//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder. PostgreSQL is the production backend; SQLite is only used
//! by the test suites.

use sea_orm::DatabaseBackend;
pub use sea_orm_migration::prelude::*;

mod m20260301_000001_chart_of_accounts;
mod m20260301_000002_general_journals;
mod m20260301_000003_inventory;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_chart_of_accounts::Migration),
            Box::new(m20260301_000002_general_journals::Migration),
            Box::new(m20260301_000003_inventory::Migration),
        ]
    }
}

/// Column for amounts, prices and quantities.
///
/// `numeric(19, 4)` on PostgreSQL. SQLite caps decimal precision at 16 and
/// keeps the value as REAL, so test data there must be binary-exact.
pub(crate) fn amount_column<T: IntoIden>(manager: &SchemaManager, name: T) -> ColumnDef {
    let mut column = ColumnDef::new(name);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => column.decimal_len(16, 4),
        _ => column.decimal_len(19, 4),
    };
    column
}
