//! Rate-fetch error types.
//!
//! These never escape [`crate::RateService::get_rates`]; the service
//! recovers locally by degrading to cached or hardcoded rates.

use thiserror::Error;

/// Errors that can occur while fetching rates from a source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("Rate request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("Rate source returned status {status}")]
    Status { status: u16 },

    /// The source is configured off for this run.
    #[error("Rate source offline")]
    Offline,
}

/// Result type for rate-fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
