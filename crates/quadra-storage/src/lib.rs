//! Quadra Storage - Address-keyed account ledger.
//!
//! This crate provides:
//! - `Ledger`: the account map with create-if-absent allocation
//! - `LedgerTransaction`: serialized, all-or-nothing units of work
//! - `Database`: JSON file persistence for ledger snapshots

pub mod account;
pub mod database;
pub mod ledger;
pub mod error;

pub use account::Account;
pub use database::Database;
pub use ledger::{Ledger, LedgerTransaction};
pub use error::StorageError;
