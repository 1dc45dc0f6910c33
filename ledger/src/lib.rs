//! Remit Ledger
//!
//! Append-only transaction store for the remit core. Transactions for all
//! users live in one persisted record; per-user views are derived on every
//! read, newest first. A user's first read seeds a fixed mock history,
//! exactly once.

pub mod error;
pub mod ledger;
pub mod seed;

pub use error::LedgerError;
pub use ledger::{Ledger, TRANSACTIONS_KEY};
