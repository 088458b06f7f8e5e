//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal line validation and balancing
//! - Account and sub-account checks for posting
//! - Balance calculations derived from journal lines
//! - Reversing journals

pub mod balance;
pub mod error;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::{AccountBalance, TrialBalance};
pub use error::LedgerError;
pub use reversal::ReversalService;
pub use service::{LedgerService, MAX_REFERENCE_LEN};
pub use types::{
    AccountInfo, EntrySide, JournalLineInput, JournalTotals, PostJournalInput, ResolvedLine,
    ValidatedJournal,
};
pub use validation::{MIN_LINES, calculate_totals, validate_lines};
