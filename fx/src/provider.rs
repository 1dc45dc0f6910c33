//! Rate source trait and implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, FetchResult};

/// The fixed endpoint the demo client fetches rates from.
pub const DEFAULT_RATES_ENDPOINT: &str =
    "https://68976304250b078c2041c7fc.mockapi.io/api/wiremit/InterviewAPIS";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One element of a rate source response.
///
/// Any subset of fields may appear in any element; absent fields leave
/// prior values unchanged when records are folded into a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialRates {
    #[serde(rename = "USD", default, skip_serializing_if = "Option::is_none")]
    pub usd: Option<Decimal>,
    #[serde(rename = "GBP", default, skip_serializing_if = "Option::is_none")]
    pub gbp: Option<Decimal>,
    #[serde(rename = "ZAR", default, skip_serializing_if = "Option::is_none")]
    pub zar: Option<Decimal>,
    #[serde(rename = "USDT", default, skip_serializing_if = "Option::is_none")]
    pub usdt: Option<Decimal>,
}

/// Trait for remote FX rate sources.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Get the source name, for logging.
    fn name(&self) -> &str;

    /// Fetch the raw partial-rate records, in response order.
    async fn fetch(&self) -> FetchResult<Vec<PartialRates>>;
}

/// HTTP rate source: GET of a fixed endpoint returning a JSON array.
pub struct HttpRateSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRateSource {
    /// Create a source for the given endpoint with a bounded request
    /// timeout.
    pub fn new(endpoint: impl Into<String>) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self) -> FetchResult<Vec<PartialRates>> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let records = response.json::<Vec<PartialRates>>().await?;
        debug!(records = records.len(), "Fetched rate records");
        Ok(records)
    }
}

/// Mock rate source for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateSource {
    name: String,
    response: parking_lot::Mutex<Option<FetchResult<Vec<PartialRates>>>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateSource {
    /// Create a mock that fails every fetch until a response is set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: parking_lot::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Set the records returned by subsequent fetches.
    pub fn set_records(&self, records: Vec<PartialRates>) {
        *self.response.lock() = Some(Ok(records));
    }

    /// Make subsequent fetches fail.
    pub fn set_failure(&self) {
        *self.response.lock() = Some(Err(FetchError::Offline));
    }

    /// Number of fetches issued against this source.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateSource for MockRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> FetchResult<Vec<PartialRates>> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        match &*self.response.lock() {
            Some(Ok(records)) => Ok(records.clone()),
            _ => Err(FetchError::Offline),
        }
    }
}
