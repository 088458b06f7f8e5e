//! Entity aliases.

pub use super::accounts::Entity as Accounts;
pub use super::general_journals::Entity as GeneralJournals;
pub use super::items::Entity as Items;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
pub use super::stock_movements::Entity as StockMovements;
