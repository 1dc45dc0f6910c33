//! Mock transaction history seeded for first-time users.
//!
//! The demo has no settlement backend, so a user's first ledger read is
//! populated with this fixed set of 16 transfers. Amounts, fees, rates,
//! recipients, statuses, and timestamps are pre-defined; only the record
//! ids are freshly generated so they stay unique across users.

use chrono::{DateTime, TimeZone, Utc};
use remit_common::{
    NewTransaction, SendCurrency, Transaction, TransactionId, TransactionStatus, UserId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use TransactionStatus::{Completed, Failed, Pending};

/// Build the mock history for `user_id`.
///
/// Deterministic in everything but the generated ids: the same 16
/// records, in the same order, every time.
pub fn mock_transactions(user_id: &UserId) -> Vec<Transaction> {
    let rows: [(Decimal, SendCurrency, Decimal, Decimal, &str, TransactionStatus, (u32, u32, u32, u32)); 16] = [
        (dec!(500), SendCurrency::Gbp, dec!(50), dec!(608.11), "John Smith - University of Oxford", Completed, (12, 15, 10, 30)),
        (dec!(300), SendCurrency::Zar, dec!(60), dec!(13.52), "Mary Johnson - University of Cape Town", Completed, (12, 14, 15, 45)),
        (dec!(750), SendCurrency::Gbp, dec!(75), dec!(912.16), "David Wilson - Imperial College London", Pending, (12, 13, 9, 15)),
        (dec!(200), SendCurrency::Zar, dec!(40), dec!(9.01), "Sarah Brown - Stellenbosch University", Completed, (12, 12, 14, 20)),
        (dec!(1000), SendCurrency::Gbp, dec!(100), dec!(1216.22), "Michael Davis - Cambridge University", Completed, (12, 11, 11, 0)),
        (dec!(450), SendCurrency::Zar, dec!(90), dec!(20.28), "Lisa Garcia - University of Witwatersrand", Failed, (12, 10, 16, 30)),
        (dec!(600), SendCurrency::Gbp, dec!(60), dec!(729.73), "James Miller - London School of Economics", Completed, (12, 9, 8, 45)),
        (dec!(350), SendCurrency::Zar, dec!(70), dec!(15.77), "Amanda White - Rhodes University", Completed, (12, 8, 13, 15)),
        (dec!(800), SendCurrency::Gbp, dec!(80), dec!(972.97), "Robert Taylor - University of Edinburgh", Completed, (12, 7, 10, 0)),
        (dec!(250), SendCurrency::Zar, dec!(50), dec!(11.27), "Jennifer Lee - University of the Western Cape", Pending, (12, 6, 15, 30)),
        (dec!(900), SendCurrency::Gbp, dec!(90), dec!(1094.59), "Kevin Anderson - King's College London", Completed, (12, 5, 9, 20)),
        (dec!(400), SendCurrency::Zar, dec!(80), dec!(18.03), "Michelle Thompson - University of Pretoria", Completed, (12, 4, 14, 45)),
        (dec!(650), SendCurrency::Gbp, dec!(65), dec!(790.54), "Daniel Martinez - University of Manchester", Failed, (12, 3, 11, 10)),
        (dec!(550), SendCurrency::Zar, dec!(110), dec!(24.79), "Patricia Rodriguez - University of Johannesburg", Completed, (12, 2, 16, 0)),
        (dec!(720), SendCurrency::Gbp, dec!(72), dec!(875.68), "Christopher Clark - University of Warwick", Completed, (12, 1, 12, 30)),
        (dec!(380), SendCurrency::Zar, dec!(76), dec!(17.13), "Laura Lewis - University of Cape Town", Pending, (11, 30, 10, 15)),
    ];

    rows.into_iter()
        .map(
            |(amount_usd, currency, fee_usd, recipient_amount, recipient, status, stamp)| {
                Transaction {
                    id: TransactionId::new(),
                    user_id: user_id.clone(),
                    amount_usd,
                    currency,
                    fee_usd,
                    exchange_rate: seed_rate(currency),
                    recipient_amount,
                    recipient: recipient.to_string(),
                    status,
                    created_at: seed_timestamp(stamp),
                }
            },
        )
        .collect()
}

/// The snapshot rates the mock history was priced at.
fn seed_rate(currency: SendCurrency) -> Decimal {
    match currency {
        SendCurrency::Gbp => dec!(0.74),
        SendCurrency::Zar => dec!(17.75),
    }
}

fn seed_timestamp((month, day, hour, minute): (u32, u32, u32, u32)) -> DateTime<Utc> {
    // All seed rows carry a known-valid 2024 date.
    Utc.with_ymd_and_hms(2024, month, day, hour, minute, 0)
        .single()
        .expect("valid seed timestamp")
}

/// Helper used by tests and the demo to build a submission from scratch.
pub fn submission(
    user_id: &UserId,
    amount_usd: Decimal,
    currency: SendCurrency,
    fee_usd: Decimal,
    exchange_rate: Decimal,
    recipient_amount: Decimal,
    recipient: impl Into<String>,
) -> NewTransaction {
    NewTransaction {
        user_id: user_id.clone(),
        amount_usd,
        currency,
        fee_usd,
        exchange_rate,
        recipient_amount,
        recipient: recipient.into(),
        status: TransactionStatus::Pending,
    }
}
