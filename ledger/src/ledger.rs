//! The persisted transaction ledger.

use parking_lot::Mutex;
use remit_common::{KeyValueStore, NewTransaction, Transaction, UserId};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::LedgerResult;
use crate::seed;

/// Storage key the transaction list lives under.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Append-only transaction store over injected key-value storage.
///
/// All users share one insertion-ordered record list; per-user views are
/// derived on read. Every read-modify-write cycle runs under a single
/// write lock so concurrent appends cannot lose updates — the storage
/// layer itself only offers whole-record replacement.
pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl Ledger {
    /// Create a ledger over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Get a user's transactions, newest first.
    ///
    /// A first access seeds the user's mock history (see
    /// [`Ledger::ensure_seeded`]). Storage or parse failures degrade to
    /// an empty view; this read never errors.
    pub fn transactions_for_user(&self, user_id: &UserId) -> Vec<Transaction> {
        if let Err(e) = self.ensure_seeded(user_id) {
            warn!(user = %user_id, error = %e, "Ledger seeding failed");
            return Vec::new();
        }

        let mut transactions = match self.load_all() {
            Ok(all) => all,
            Err(e) => {
                warn!(user = %user_id, error = %e, "Ledger unreadable");
                return Vec::new();
            }
        };

        transactions.retain(|t| &t.user_id == user_id);
        // Stable sort: ties on created_at keep store insertion order.
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transactions
    }

    /// Seed the user's mock history if they have no records yet.
    ///
    /// Idempotent: the presence check runs under the write lock, so the
    /// history is generated at most once per user even under concurrent
    /// first reads.
    pub fn ensure_seeded(&self, user_id: &UserId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock();

        let mut all = self.load_all()?;
        if all.iter().any(|t| &t.user_id == user_id) {
            debug!(user = %user_id, "Ledger already seeded");
            return Ok(());
        }

        let seeds = seed::mock_transactions(user_id);
        info!(user = %user_id, records = seeds.len(), "Seeding mock history");
        all.extend(seeds);
        self.persist_all(&all)
    }

    /// Append a transaction, assigning a fresh id and the current time.
    ///
    /// The one ledger operation allowed to fail visibly: losing a
    /// submitted transfer silently is unacceptable.
    pub fn add_transaction(&self, new: NewTransaction) -> LedgerResult<Transaction> {
        let _guard = self.write_lock.lock();

        let mut all = self.load_all()?;
        let transaction = new.into_transaction();
        all.push(transaction.clone());
        self.persist_all(&all)?;

        info!(
            transaction_id = %transaction.id,
            user = %transaction.user_id,
            amount_usd = %transaction.amount_usd,
            currency = %transaction.currency,
            "Transaction recorded"
        );

        Ok(transaction)
    }

    fn load_all(&self) -> LedgerResult<Vec<Transaction>> {
        match self.store.get(TRANSACTIONS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist_all(&self, all: &[Transaction]) -> LedgerResult<()> {
        let encoded = serde_json::to_string(all)?;
        self.store.set(TRANSACTIONS_KEY, &encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use remit_common::{MemoryStore, SendCurrency, StorageError, StorageResult};
    use rust_decimal_macros::dec;

    fn make_ledger() -> Ledger {
        Ledger::new(Arc::new(MemoryStore::new()))
    }

    fn submission(user: &UserId, recipient: &str) -> NewTransaction {
        seed::submission(
            user,
            dec!(500),
            SendCurrency::Gbp,
            dec!(50),
            dec!(0.74),
            dec!(608.11),
            recipient,
        )
    }

    #[test]
    fn test_first_read_seeds_sixteen_records() {
        let ledger = make_ledger();
        let user = UserId::new("user-1");

        let history = ledger.transactions_for_user(&user);

        assert_eq!(history.len(), 16);
        assert!(history.iter().all(|t| t.user_id == user));
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let ledger = make_ledger();
        let user = UserId::new("user-1");

        let first = ledger.transactions_for_user(&user);
        let second = ledger.transactions_for_user(&user);

        assert_eq!(second.len(), 16);
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_user_gets_their_own_seeds() {
        let ledger = make_ledger();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        let alice_view = ledger.transactions_for_user(&alice);
        let bob_view = ledger.transactions_for_user(&bob);

        assert_eq!(alice_view.len(), 16);
        assert_eq!(bob_view.len(), 16);
        assert!(bob_view.iter().all(|t| t.user_id == bob));

        // Seeding bob must not disturb alice's view.
        assert_eq!(ledger.transactions_for_user(&alice), alice_view);
    }

    #[test]
    fn test_add_transaction_appends_and_round_trips() {
        let ledger = make_ledger();
        let user = UserId::new("user-1");

        ledger.transactions_for_user(&user);
        let new = submission(&user, "Thandi Moyo - University of Fort Hare");
        let recorded = ledger.add_transaction(new.clone()).unwrap();

        let history = ledger.transactions_for_user(&user);
        assert_eq!(history.len(), 17);

        // Newest first: the fresh submission leads.
        assert_eq!(history[0], recorded);
        assert_eq!(history[0].user_id, new.user_id);
        assert_eq!(history[0].amount_usd, new.amount_usd);
        assert_eq!(history[0].currency, new.currency);
        assert_eq!(history[0].fee_usd, new.fee_usd);
        assert_eq!(history[0].exchange_rate, new.exchange_rate);
        assert_eq!(history[0].recipient_amount, new.recipient_amount);
        assert_eq!(history[0].recipient, new.recipient);
        assert_eq!(history[0].status, new.status);
    }

    #[test]
    fn test_existing_records_suppress_seeding() {
        let ledger = make_ledger();
        let user = UserId::new("user-1");

        // The user's first record arrives via a submit, not a read.
        ledger.add_transaction(submission(&user, "R. Ndlovu")).unwrap();

        let history = ledger.transactions_for_user(&user);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_ordering_is_newest_first_regardless_of_insertion() {
        let store = Arc::new(MemoryStore::new());
        let ledger = Ledger::new(store);
        let user = UserId::new("user-1");

        // Seed records span 2024-11-30 to 2024-12-15; anything submitted
        // now sorts first, wherever it lands in the store.
        ledger.transactions_for_user(&user);
        ledger.add_transaction(submission(&user, "newest")).unwrap();

        let history = ledger.transactions_for_user(&user);
        assert_eq!(history[0].recipient, "newest");
        for pair in history.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        assert_eq!(
            history.last().unwrap().created_at,
            Utc.with_ymd_and_hms(2024, 11, 30, 10, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_corrupt_store_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(TRANSACTIONS_KEY, "{definitely not json").unwrap();
        let ledger = Ledger::new(store);

        let history = ledger.transactions_for_user(&UserId::new("user-1"));

        assert!(history.is_empty());
    }

    #[test]
    fn test_corrupt_store_fails_the_write_path() {
        let store = Arc::new(MemoryStore::new());
        store.set(TRANSACTIONS_KEY, "{definitely not json").unwrap();
        let ledger = Ledger::new(store);
        let user = UserId::new("user-1");

        let result = ledger.add_transaction(submission(&user, "X"));

        assert!(result.is_err());
    }

    /// Store double whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(Some("[]".to_string()))
        }

        fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::io(
                key,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    #[test]
    fn test_write_failure_surfaces_on_add() {
        let ledger = Ledger::new(Arc::new(ReadOnlyStore));
        let user = UserId::new("user-1");

        let result = ledger.add_transaction(submission(&user, "X"));

        assert!(matches!(result, Err(crate::LedgerError::Storage(_))));
    }

    #[test]
    fn test_write_failure_degrades_read_to_empty() {
        // Seeding cannot persist, so the read degrades rather than
        // returning records that would vanish on the next call.
        let ledger = Ledger::new(Arc::new(ReadOnlyStore));

        assert!(ledger.transactions_for_user(&UserId::new("user-1")).is_empty());
    }

    #[test]
    fn test_seeded_records_persist_in_store() {
        let store = Arc::new(MemoryStore::new());
        let ledger = Ledger::new(store.clone());
        let user = UserId::new("user-1");

        ledger.transactions_for_user(&user);

        // A second ledger over the same store sees the seeded history
        // and does not reseed.
        let reopened = Ledger::new(store);
        assert_eq!(reopened.transactions_for_user(&user).len(), 16);
    }

    #[test]
    fn test_status_field_serializes_like_the_original() {
        let ledger = make_ledger();
        let user = UserId::new("user-1");
        let recorded = ledger.add_transaction(submission(&user, "X")).unwrap();

        let json = serde_json::to_string(&recorded).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("\"currency\":\"GBP\""));
    }
}
