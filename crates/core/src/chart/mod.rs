//! Chart of accounts rules.
//!
//! This module implements the account hierarchy invariants:
//! - Five account types with a fixed normal balance side
//! - At most one level of sub-accounts, sharing the parent's type
//! - Cycle detection by walking the parent chain
//! - Deletion guards (children, transactions, system accounts)
//! - Deterministic account code generation per type block

pub mod code;
pub mod error;
pub mod hierarchy;
pub mod types;

#[cfg(test)]
mod hierarchy_props;

pub use code::generate_account_code;
pub use error::{ChartError, InvalidParentReason};
pub use hierarchy::{
    ChartGraph, DeletionGuard, ParentLookup, validate_create, validate_deletion,
    validate_new_parent, validate_update, would_create_cycle,
};
pub use types::{AccountDraft, AccountNode, AccountType, NormalBalance};
