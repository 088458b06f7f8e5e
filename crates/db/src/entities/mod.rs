//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod general_journals;
pub mod items;
pub mod journal_entry_lines;
pub mod sea_orm_active_enums;
pub mod stock_movements;
