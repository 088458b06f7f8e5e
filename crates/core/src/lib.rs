//! Core business logic for Ledgerline.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `chart` - Chart of accounts hierarchy rules and code generation
//! - `ledger` - Double-entry journal validation, balances, reversals
//! - `inventory` - Stock movement valuation (on-hand and total value)

pub mod chart;
pub mod inventory;
pub mod ledger;
