//! The rate service: cache-first rate retrieval that never fails outward.

use remit_common::{KeyValueStore, RateSnapshot};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{RateCache, RateCacheConfig};
use crate::provider::{PartialRates, RateSource};

/// Cache-backed access to the current FX rates.
///
/// `get_rates` always returns a usable snapshot: a fresh cache entry if
/// one exists, else a freshly fetched snapshot, else a stale cache entry,
/// else the hardcoded fallback. Errors are recovered here and never
/// surfaced to the caller.
pub struct RateService {
    source: Arc<dyn RateSource>,
    cache: RateCache,
}

impl RateService {
    /// Create a service with the default cache configuration.
    pub fn new(source: Arc<dyn RateSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            source,
            cache: RateCache::new(store),
        }
    }

    /// Create a service with a custom cache configuration.
    pub fn with_cache_config(
        source: Arc<dyn RateSource>,
        store: Arc<dyn KeyValueStore>,
        config: RateCacheConfig,
    ) -> Self {
        Self {
            source,
            cache: RateCache::with_config(store, config),
        }
    }

    /// Get the current rates.
    ///
    /// A fresh cache entry short-circuits without touching the network;
    /// this is the dominant path.
    pub async fn get_rates(&self) -> RateSnapshot {
        if let Some(cached) = self.cache.read() {
            debug!("Using cached rates");
            return cached;
        }

        match self.source.fetch().await {
            Ok(records) => {
                let rates = fold_records(&records);
                info!(source = self.source.name(), "Fetched fresh rates");

                if let Err(e) = self.cache.write(&rates) {
                    warn!(error = %e, "Failed to persist rate cache");
                }

                rates
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Rate fetch failed");

                // Stale-but-present beats nothing; the cache is untouched.
                self.cache.read_stale().unwrap_or_else(|| {
                    warn!("No cached rates, using hardcoded fallback");
                    RateSnapshot::fallback()
                })
            }
        }
    }
}

/// Fold partial-rate records into a snapshot, in response order.
///
/// Starts from the hardcoded fallback; a field overwrites only when
/// present and non-zero, and later records win on conflicts.
pub fn fold_records(records: &[PartialRates]) -> RateSnapshot {
    let mut rates = RateSnapshot::fallback();

    for record in records {
        apply(&mut rates.usd, record.usd);
        apply(&mut rates.gbp, record.gbp);
        apply(&mut rates.zar, record.zar);
        apply(&mut rates.usdt, record.usdt);
    }

    rates
}

fn apply(field: &mut Decimal, value: Option<Decimal>) {
    if let Some(v) = value {
        if !v.is_zero() {
            *field = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FX_RATES_CACHE_KEY;
    use crate::provider::MockRateSource;
    use chrono::Duration;
    use remit_common::MemoryStore;
    use rust_decimal_macros::dec;

    fn gbp_record(rate: Decimal) -> PartialRates {
        PartialRates {
            gbp: Some(rate),
            ..Default::default()
        }
    }

    fn setup() -> (Arc<MockRateSource>, Arc<MemoryStore>, RateService) {
        let source = Arc::new(MockRateSource::new("test"));
        let store = Arc::new(MemoryStore::new());
        let service = RateService::new(source.clone(), store.clone());
        (source, store, service)
    }

    #[test]
    fn test_fold_empty_yields_fallback() {
        assert_eq!(fold_records(&[]), RateSnapshot::fallback());
    }

    #[test]
    fn test_fold_overwrites_present_fields_only() {
        let records = vec![gbp_record(dec!(0.80))];
        let rates = fold_records(&records);

        assert_eq!(rates.gbp, dec!(0.80));
        // Untouched fields keep the fallback values.
        assert_eq!(rates.zar, dec!(17.75));
        assert_eq!(rates.usd, dec!(1));
    }

    #[test]
    fn test_fold_later_records_win() {
        let records = vec![gbp_record(dec!(0.80)), gbp_record(dec!(0.82))];

        assert_eq!(fold_records(&records).gbp, dec!(0.82));
    }

    #[test]
    fn test_fold_skips_zero_fields() {
        let records = vec![gbp_record(dec!(0.80)), gbp_record(dec!(0))];

        // Zero reads as absent, so the earlier value stands.
        assert_eq!(fold_records(&records).gbp, dec!(0.80));
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let (source, _store, service) = setup();
        source.set_records(vec![gbp_record(dec!(0.80))]);

        let first = service.get_rates().await;
        let second = service.get_rates().await;

        assert_eq!(first, second);
        // Exactly one network call for the two reads.
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_triggers_refetch() {
        let source = Arc::new(MockRateSource::new("test"));
        let store = Arc::new(MemoryStore::new());
        let config = RateCacheConfig {
            ttl: Duration::milliseconds(50),
        };
        let service = RateService::with_cache_config(source.clone(), store, config);
        source.set_records(vec![gbp_record(dec!(0.80))]);

        service.get_rates().await;
        std::thread::sleep(std::time::Duration::from_millis(60));
        service.get_rates().await;

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_with_no_cache_yields_fallback() {
        let (source, _store, service) = setup();
        source.set_failure();

        assert_eq!(service.get_rates().await, RateSnapshot::fallback());
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_stale_cache() {
        let source = Arc::new(MockRateSource::new("test"));
        let store = Arc::new(MemoryStore::new());
        let config = RateCacheConfig {
            ttl: Duration::milliseconds(50),
        };
        let service = RateService::with_cache_config(source.clone(), store, config);

        source.set_records(vec![gbp_record(dec!(0.80))]);
        let fetched = service.get_rates().await;

        // Cache expires, then the source goes down.
        std::thread::sleep(std::time::Duration::from_millis(60));
        source.set_failure();

        // Stale cache beats the hardcoded fallback.
        assert_eq!(service.get_rates().await, fetched);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_cache_untouched() {
        let (source, store, service) = setup();

        source.set_records(vec![gbp_record(dec!(0.80))]);
        service.get_rates().await;
        let cached_before = store.get(FX_RATES_CACHE_KEY).unwrap();

        source.set_failure();
        service.get_rates().await;

        assert_eq!(store.get(FX_RATES_CACHE_KEY).unwrap(), cached_before);
    }

    #[tokio::test]
    async fn test_success_updates_cache() {
        let (source, store, service) = setup();
        source.set_records(vec![gbp_record(dec!(0.80))]);

        assert!(store.get(FX_RATES_CACHE_KEY).unwrap().is_none());
        service.get_rates().await;
        assert!(store.get(FX_RATES_CACHE_KEY).unwrap().is_some());
    }
}
