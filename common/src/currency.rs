//! Currency codes and rate snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A currency the rate source quotes, relative to USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "ZAR")]
    Zar,
    #[serde(rename = "USDT")]
    Usdt,
}

impl Currency {
    /// Get the ISO-style ticker for this currency.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Zar => "ZAR",
            Currency::Usdt => "USDT",
        }
    }

    /// All currencies a snapshot carries.
    pub fn all() -> [Currency; 4] {
        [Currency::Usd, Currency::Gbp, Currency::Zar, Currency::Usdt]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A currency transfers can be sent to.
///
/// The fee schedule is keyed by this set; adding a corridor means adding a
/// variant and a fee row, never inferring one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SendCurrency {
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "ZAR")]
    Zar,
}

impl SendCurrency {
    /// Get the ticker for this destination currency.
    pub fn code(&self) -> &'static str {
        Currency::from(*self).code()
    }
}

impl From<SendCurrency> for Currency {
    fn from(c: SendCurrency) -> Self {
        match c {
            SendCurrency::Gbp => Currency::Gbp,
            SendCurrency::Zar => Currency::Zar,
        }
    }
}

impl fmt::Display for SendCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SendCurrency {
    type Err = UnsupportedCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GBP" => Ok(SendCurrency::Gbp),
            "ZAR" => Ok(SendCurrency::Zar),
            _ => Err(UnsupportedCurrencyError(s.to_string())),
        }
    }
}

/// Error for currency codes outside the supported corridor set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unsupported destination currency: {0}")]
pub struct UnsupportedCurrencyError(pub String);

/// A complete set of conversion factors relative to USD at one instant.
///
/// Each field is "units of that currency per 1 USD". The USD field of any
/// snapshot is 1. Snapshots are value types; a new fetch produces a new
/// snapshot, never mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(rename = "USD")]
    pub usd: Decimal,
    #[serde(rename = "GBP")]
    pub gbp: Decimal,
    #[serde(rename = "ZAR")]
    pub zar: Decimal,
    #[serde(rename = "USDT")]
    pub usdt: Decimal,
}

impl RateSnapshot {
    /// The hardcoded snapshot used when neither the network nor the cache
    /// can produce rates.
    pub fn fallback() -> Self {
        Self {
            usd: Decimal::ONE,
            gbp: Decimal::new(74, 2),   // 0.74
            zar: Decimal::new(1775, 2), // 17.75
            usdt: Decimal::ONE,
        }
    }

    /// Look up the rate for a currency.
    pub fn rate(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.usd,
            Currency::Gbp => self.gbp,
            Currency::Zar => self.zar,
            Currency::Usdt => self.usdt,
        }
    }
}

impl Default for RateSnapshot {
    fn default() -> Self {
        Self::fallback()
    }
}
