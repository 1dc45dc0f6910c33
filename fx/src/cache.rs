//! Persisted FX rate caching with a bounded staleness window.

use chrono::{Duration, Utc};
use remit_common::{KeyValueStore, RateSnapshot, StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key the cached snapshot lives under.
pub const FX_RATES_CACHE_KEY: &str = "fx_rates_cache";

/// The persisted cache record: snapshot plus fetch time in Unix millis.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    rates: RateSnapshot,
    timestamp: i64,
}

impl CacheEntry {
    fn new(rates: RateSnapshot) -> Self {
        Self {
            rates,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        let age_ms = Utc::now().timestamp_millis() - self.timestamp;
        age_ms < ttl.num_milliseconds()
    }
}

/// Configuration for the rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// How long a snapshot counts as fresh.
    pub ttl: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(5),
        }
    }
}

/// Rate cache backed by durable key-value storage.
///
/// Holds at most one snapshot; a write replaces the prior entry. The
/// entry survives process restarts within the same store scope.
pub struct RateCache {
    store: Arc<dyn KeyValueStore>,
    config: RateCacheConfig,
}

impl RateCache {
    /// Create a cache with the default 5 minute TTL.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, RateCacheConfig::default())
    }

    /// Create a cache with a custom configuration.
    pub fn with_config(store: Arc<dyn KeyValueStore>, config: RateCacheConfig) -> Self {
        Self { store, config }
    }

    /// Get the cached snapshot if it is still fresh. No side effects.
    pub fn read(&self) -> Option<RateSnapshot> {
        let entry = self.read_entry()?;

        if entry.is_fresh(self.config.ttl) {
            debug!("Rate cache hit");
            Some(entry.rates)
        } else {
            debug!("Rate cache entry expired");
            None
        }
    }

    /// Get the cached snapshot regardless of age.
    ///
    /// Fallback path for when the rate source is unreachable: stale rates
    /// beat no rates.
    pub fn read_stale(&self) -> Option<RateSnapshot> {
        self.read_entry().map(|entry| entry.rates)
    }

    /// Store a snapshot stamped with the current time, replacing any
    /// prior entry.
    pub fn write(&self, rates: &RateSnapshot) -> StorageResult<()> {
        let entry = CacheEntry::new(rates.clone());
        let encoded = serde_json::to_string(&entry)
            .map_err(|e| StorageError::codec(FX_RATES_CACHE_KEY, e))?;
        self.store.set(FX_RATES_CACHE_KEY, &encoded)
    }

    /// An unreadable or corrupt record reads as absent.
    fn read_entry(&self) -> Option<CacheEntry> {
        let raw = match self.store.get(FX_RATES_CACHE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read rate cache");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Discarding malformed rate cache record");
                None
            }
        }
    }
}
