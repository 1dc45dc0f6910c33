//! Remit Demo
//!
//! Command-line walkthrough of the remit core: fetch rates, price a
//! transfer, optionally submit it, and print the user's history. Stands
//! in for the browser UI, including its input validation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remit_common::{FileStore, KeyValueStore, MemoryStore, SendCurrency, UserId};
use remit_fx::{
    pricing, FetchError, HttpRateSource, PartialRates, RateService, RateSource,
    DEFAULT_RATES_ENDPOINT,
};
use remit_ledger::Ledger;

/// Bounds the UI enforces on the send amount, in USD.
const MIN_AMOUNT_USD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const MAX_AMOUNT_USD: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Remit core demo CLI
#[derive(Parser, Debug)]
#[command(name = "remit-demo")]
#[command(about = "Walk the rate/quote/submit/history pipeline from the command line")]
struct Args {
    /// User id to operate as
    #[arg(short, long, default_value = "demo-user")]
    user: String,

    /// Amount to send, in USD (accepted range 50-5000)
    #[arg(short, long, default_value = "100")]
    amount: Decimal,

    /// Destination currency (GBP or ZAR)
    #[arg(short, long, default_value = "GBP")]
    currency: SendCurrency,

    /// Recipient to submit a transfer to; without this, only a quote and
    /// the history are shown
    #[arg(short, long)]
    recipient: Option<String>,

    /// Directory for durable storage; omit for an in-memory run
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Skip the network and exercise the cache/fallback path
    #[arg(long)]
    offline: bool,
}

/// Rate source for offline runs: every fetch fails, pushing the service
/// onto its cache-then-fallback path.
struct OfflineRateSource;

#[async_trait]
impl RateSource for OfflineRateSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn fetch(&self) -> Result<Vec<PartialRates>, FetchError> {
        Err(FetchError::Offline)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Amount bounds belong to the UI layer, not the pricing engine.
    if args.amount < MIN_AMOUNT_USD || args.amount > MAX_AMOUNT_USD {
        bail!(
            "Amount {} USD is outside the accepted range {}-{}",
            args.amount,
            MIN_AMOUNT_USD,
            MAX_AMOUNT_USD
        );
    }

    let store: Arc<dyn KeyValueStore> = match &args.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Using file-backed storage");
            Arc::new(FileStore::open(dir).context("opening data directory")?)
        }
        None => Arc::new(MemoryStore::new()),
    };

    let source: Arc<dyn RateSource> = if args.offline {
        Arc::new(OfflineRateSource)
    } else {
        Arc::new(HttpRateSource::new(DEFAULT_RATES_ENDPOINT).context("building rate source")?)
    };

    let rates = RateService::new(source, store.clone()).get_rates().await;
    let quote = pricing::price(args.amount, args.currency, &rates);

    println!("Sending {} USD to {}", args.amount, args.currency);
    println!(
        "  fee:        {} USD ({}%)",
        quote.fee_usd,
        quote.fee_percentage * Decimal::ONE_HUNDRED
    );
    println!("  after fee:  {} USD", quote.amount_after_fee);
    println!("  rate:       {}", quote.exchange_rate);
    println!("  recipient:  {} {}", quote.recipient_amount, args.currency);

    let ledger = Ledger::new(store);
    let user = UserId::new(args.user);

    if let Some(recipient) = args.recipient {
        let recorded = ledger
            .add_transaction(remit_ledger::seed::submission(
                &user,
                args.amount,
                args.currency,
                quote.fee_usd,
                quote.exchange_rate,
                quote.recipient_amount,
                recipient,
            ))
            .context("recording transaction")?;
        println!("\nSubmitted transfer {}", recorded.id);
    }

    println!("\nTransaction history for {user}:");
    for tx in ledger.transactions_for_user(&user) {
        println!(
            "  {}  {:>8} USD -> {:>8} {}  {:<9}  {}",
            tx.created_at.format("%Y-%m-%d %H:%M"),
            tx.amount_usd,
            tx.recipient_amount,
            tx.currency,
            tx.status,
            tx.recipient
        );
    }

    Ok(())
}
