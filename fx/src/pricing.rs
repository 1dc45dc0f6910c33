//! Pure transfer pricing: fee and conversion amounts for a transfer.
//!
//! No I/O, no state, no error path. Callers pre-validate the amount (the
//! accepted external range is 50-5000 USD); behavior for non-positive
//! amounts or rates is unspecified.

use remit_common::{Currency, RateSnapshot, SendCurrency};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Priced breakdown of a transfer request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Fee charged, in USD. Rounded up to the cent.
    pub fee_usd: Decimal,
    /// Fee fraction applied (0.10 for GBP, 0.20 for ZAR).
    pub fee_percentage: Decimal,
    /// Snapshot rate used for the conversion.
    pub exchange_rate: Decimal,
    /// Amount delivered, in the destination currency. Rounded up to the
    /// minor unit.
    pub recipient_amount: Decimal,
    /// Source amount net of the fee, in USD.
    pub amount_after_fee: Decimal,
}

/// Fee fraction for a destination currency.
///
/// Closed, hardcoded schedule: a new corridor gets a new row here, the
/// rate is never inferred.
pub fn fee_percentage(currency: SendCurrency) -> Decimal {
    match currency {
        SendCurrency::Gbp => Decimal::new(10, 2), // 10%
        SendCurrency::Zar => Decimal::new(20, 2), // 20%
    }
}

/// Price a transfer of `amount_usd` to `currency` at the given rates.
///
/// Both the fee and the recipient amount round UP to the nearest minor
/// unit; rounding in the operator's favor is part of the pricing policy.
pub fn price(amount_usd: Decimal, currency: SendCurrency, rates: &RateSnapshot) -> Quote {
    let fee_percentage = fee_percentage(currency);
    let exchange_rate = rates.rate(Currency::from(currency));

    let fee_usd = ceil_minor(amount_usd * fee_percentage);
    let amount_after_fee = amount_usd - fee_usd;
    let recipient_amount = ceil_minor(amount_after_fee / exchange_rate);

    Quote {
        fee_usd,
        fee_percentage,
        exchange_rate,
        recipient_amount,
        amount_after_fee,
    }
}

/// Round up to two decimal places, never down or to-nearest.
fn ceil_minor(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity)
}
