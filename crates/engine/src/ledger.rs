//! The ledger: transaction lifecycle and committed reads

use parking_lot::RwLock;
use std::sync::Arc;
use tally_concurrency::{CommitReceipt, LedgerSnapshot, TransactionContext, TransactionManager};
use tally_core::{ContractEvent, HistoryRecord, Result, Version};
use tally_store::VersionedStore;

type EventSubscriber = Box<dyn Fn(&ContractEvent) + Send + Sync>;

/// A versioned ledger with optimistic concurrency.
///
/// Any number of transactions may execute concurrently, each against its
/// own snapshot; the ledger serializes only their commits. Contract
/// facades share one `Ledger` through an `Arc` and stay stateless.
///
/// Conflicted transactions are surfaced to the caller, never retried
/// here; [`tally_core::Error::is_retryable`] tells callers whether a
/// resubmission can help.
pub struct Ledger {
    store: Arc<VersionedStore>,
    manager: TransactionManager,
    subscribers: RwLock<Vec<EventSubscriber>>,
}

impl Ledger {
    /// Create an empty ledger with the commit counter at zero.
    pub fn new() -> Self {
        Self::with_start_version(0)
    }

    /// Create an empty ledger with the commit counter at `start_version`.
    ///
    /// Useful when the surrounding platform dictates where version
    /// numbering resumes.
    pub fn with_start_version(start_version: u64) -> Self {
        Ledger {
            store: Arc::new(VersionedStore::new()),
            manager: TransactionManager::new(start_version),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Open a transaction against the latest committed snapshot.
    pub fn begin(&self) -> TransactionContext {
        TransactionContext::open(LedgerSnapshot::new(self.store.snapshot()))
    }

    /// Validate and commit a transaction.
    ///
    /// On success the transaction's buffered events are delivered to
    /// subscribers before this returns. On conflict nothing is applied
    /// and nothing is delivered.
    pub fn commit(&self, txn: TransactionContext) -> Result<CommitReceipt> {
        let receipt = self.manager.commit(txn, &self.store)?;
        self.publish(&receipt.events);
        Ok(receipt)
    }

    /// Run `f` inside a transaction and commit if it returns `Ok`.
    ///
    /// A domain error from `f` aborts the transaction with zero side
    /// effects: no writes, no events. A `Conflict` from the commit step
    /// propagates as-is.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut TransactionContext) -> Result<T>,
    ) -> Result<T> {
        let mut txn = self.begin();
        match f(&mut txn) {
            Ok(value) => {
                self.commit(txn)?;
                Ok(value)
            }
            Err(err) => {
                txn.mark_aborted(err.to_string());
                Err(err)
            }
        }
    }

    /// Register an observer for committed events.
    ///
    /// Delivery is fire-and-forget, in emission order, strictly after the
    /// emitting transaction commits. Events of aborted transactions are
    /// never seen here.
    pub fn subscribe(&self, f: impl Fn(&ContractEvent) + Send + Sync + 'static) {
        self.subscribers.write().push(Box::new(f));
    }

    fn publish(&self, events: &[ContractEvent]) {
        if events.is_empty() {
            return;
        }
        let subscribers = self.subscribers.read();
        for event in events {
            tracing::debug!(event = %event.name, "delivering committed event");
            for subscriber in subscribers.iter() {
                subscriber(event);
            }
        }
    }

    /// Fast-path committed read, outside any transaction.
    pub fn get(&self, key: &str) -> Option<(Vec<u8>, Version)> {
        self.store.get(key)
    }

    /// Snapshot of committed state as of now, for advisory scans.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.store.snapshot())
    }

    /// All committed mutations of `key`, oldest first, tombstones included.
    pub fn history_of(&self, key: &str) -> Vec<HistoryRecord> {
        self.store.history_of(key)
    }

    /// Current value of the global commit counter.
    pub fn current_version(&self) -> u64 {
        self.manager.current_version()
    }

    /// Number of live committed keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the committed key space is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
