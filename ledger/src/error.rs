//! Ledger error types.

use remit_common::StorageError;
use thiserror::Error;

/// Errors that can occur in the ledger.
///
/// Only the write path surfaces these; reads degrade to an empty view.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The underlying store failed.
    #[error("Ledger storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The persisted transaction record could not be encoded or decoded.
    #[error("Ledger record malformed: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
