//! Remit Common Types
//!
//! This crate contains shared types used across the remit core,
//! including currencies, rate snapshots, transaction records, and the
//! key-value storage abstraction the stateful components persist through.

pub mod currency;
pub mod storage;
pub mod transaction;

pub use currency::*;
pub use storage::*;
pub use transaction::*;
