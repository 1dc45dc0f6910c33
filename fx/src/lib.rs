//! Remit FX
//!
//! Exchange-rate pipeline for the remit core: a persisted rate cache with
//! a bounded staleness window, a rate source abstraction with an HTTP
//! implementation, an infallible rate service that degrades from cache to
//! hardcoded defaults, and the pure transfer pricing function.
//!
//! # Example
//!
//! ```rust,ignore
//! use remit_fx::{HttpRateSource, RateService, pricing};
//! use remit_common::{MemoryStore, SendCurrency};
//! use std::sync::Arc;
//!
//! let source = Arc::new(HttpRateSource::new(remit_fx::DEFAULT_RATES_ENDPOINT)?);
//! let service = RateService::new(source, Arc::new(MemoryStore::new()));
//!
//! // Never fails; falls back to cached or hardcoded rates.
//! let rates = service.get_rates().await;
//! let quote = pricing::price("500".parse()?, SendCurrency::Gbp, &rates);
//! ```

pub mod cache;
pub mod error;
pub mod pricing;
pub mod provider;
pub mod rates;

pub use cache::{RateCache, RateCacheConfig, FX_RATES_CACHE_KEY};
pub use error::FetchError;
pub use pricing::{price, Quote};
pub use provider::{HttpRateSource, PartialRates, RateSource, DEFAULT_RATES_ENDPOINT};
pub use rates::RateService;
