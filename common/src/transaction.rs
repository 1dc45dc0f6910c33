//! Transaction records and their identifiers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::currency::SendCurrency;

/// Unique identifier for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new transaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user owning a ledger view.
///
/// The core never inspects auth state; it receives this opaque id from the
/// (out of scope) authentication component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Settlement status of a transaction.
///
/// Fixed at creation by this core; only seeded history arrives with varied
/// statuses. An external settlement process owns later transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A single money-transfer record in the ledger.
///
/// Append-only: records are created once at submission time and never
/// deleted. The exchange rate is frozen into the record at computation
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique record ID.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Source amount in USD.
    pub amount_usd: Decimal,
    /// Destination currency.
    pub currency: SendCurrency,
    /// Fee charged, in USD.
    pub fee_usd: Decimal,
    /// Snapshot rate used for the conversion.
    pub exchange_rate: Decimal,
    /// Amount delivered, in the destination currency.
    pub recipient_amount: Decimal,
    /// Free-text recipient identifier.
    pub recipient: String,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Creation timestamp. Immutable.
    pub created_at: DateTime<Utc>,
}

/// Input for appending a transaction: everything the caller supplies.
///
/// The ledger assigns the id and timestamp on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Owning user.
    pub user_id: UserId,
    /// Source amount in USD.
    pub amount_usd: Decimal,
    /// Destination currency.
    pub currency: SendCurrency,
    /// Fee charged, in USD.
    pub fee_usd: Decimal,
    /// Snapshot rate used for the conversion.
    pub exchange_rate: Decimal,
    /// Amount delivered, in the destination currency.
    pub recipient_amount: Decimal,
    /// Free-text recipient identifier.
    pub recipient: String,
    /// Settlement status.
    pub status: TransactionStatus,
}

impl NewTransaction {
    /// Materialize the full record with a fresh id and the current time.
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            user_id: self.user_id,
            amount_usd: self.amount_usd,
            currency: self.currency,
            fee_usd: self.fee_usd,
            exchange_rate: self.exchange_rate,
            recipient_amount: self.recipient_amount,
            recipient: self.recipient,
            status: self.status,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_new() -> NewTransaction {
        NewTransaction {
            user_id: UserId::new("user-1"),
            amount_usd: dec!(500),
            currency: SendCurrency::Gbp,
            fee_usd: dec!(50),
            exchange_rate: dec!(0.74),
            recipient_amount: dec!(608.11),
            recipient: "John Smith - University of Oxford".to_string(),
            status: TransactionStatus::Pending,
        }
    }

    #[test]
    fn test_into_transaction_preserves_fields() {
        let new = sample_new();
        let tx = new.clone().into_transaction();

        assert_eq!(tx.user_id, new.user_id);
        assert_eq!(tx.amount_usd, new.amount_usd);
        assert_eq!(tx.currency, new.currency);
        assert_eq!(tx.fee_usd, new.fee_usd);
        assert_eq!(tx.exchange_rate, new.exchange_rate);
        assert_eq!(tx.recipient_amount, new.recipient_amount);
        assert_eq!(tx.recipient, new.recipient);
        assert_eq!(tx.status, new.status);
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = sample_new().into_transaction();
        let b = sample_new().into_transaction();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&TransactionStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");

        let back: TransactionStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(back, TransactionStatus::Failed);
    }
}
