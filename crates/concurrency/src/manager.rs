//! Transaction manager: the commit validator
//!
//! Commit is the only serialization point in the system. The manager
//! holds a commit lock so that validation and apply execute atomically
//! with respect to every other commit:
//!
//! ```text
//! 1. Acquire commit lock
//! 2. Validate read set against current committed versions
//! 3. IF any key mismatches: abort, surface Conflict, apply nothing
//! 4. Allocate commit version (global counter + 1)
//! 5. Apply the whole write set, stamp every key, append history
//! 6. Release lock, hand buffered events to the caller
//! ```
//!
//! Without the lock the classic TOCTOU race returns: T1 validates, T2
//! validates against the same state, T1 applies, T2 applies over it with
//! a stale validation. The lock makes validate-then-apply one step.
//!
//! This is what makes read-check-increment safe under concurrent
//! submission: two transactions that both observed the same pre-increment
//! version cannot both commit; the second one's read set no longer
//! matches and it is rejected for resubmission.

use crate::transaction::{TransactionContext, WriteOp};
use crate::validation::{validate_read_set, ValidationResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tally_core::{ContractEvent, Error, Result, TxnId, Version};
use tally_store::VersionedStore;

/// What a successful commit produced.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// The committed transaction.
    pub txn_id: TxnId,
    /// Version stamped onto every written key; `None` for a read-only
    /// transaction, which validates but writes nothing.
    pub version: Option<Version>,
    /// Commit wall-clock time, shared by the history records.
    pub committed_at: DateTime<Utc>,
    /// Events buffered during execution, now safe to deliver.
    pub events: Vec<ContractEvent>,
}

/// Coordinates atomic commits against a [`VersionedStore`].
///
/// Holds the global commit counter and the commit lock. The counter
/// advances once per committed writing transaction; all keys written by
/// that transaction share the allocated version. Gaps never occur here
/// because allocation happens after validation, but consumers should not
/// assume contiguity regardless.
pub struct TransactionManager {
    /// Global commit counter.
    commit_counter: AtomicU64,
    /// Serializes validate-then-apply across all commits.
    commit_lock: Mutex<()>,
}

impl TransactionManager {
    /// Create a manager starting from `initial_version`.
    pub fn new(initial_version: u64) -> Self {
        TransactionManager {
            commit_counter: AtomicU64::new(initial_version),
            commit_lock: Mutex::new(()),
        }
    }

    /// Current value of the global commit counter.
    pub fn current_version(&self) -> u64 {
        self.commit_counter.load(Ordering::SeqCst)
    }

    /// Allocate the next commit version.
    fn allocate_version(&self) -> Version {
        Version::new(self.commit_counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Validate and atomically apply one transaction.
    ///
    /// On conflict the transaction is consumed and discarded: none of its
    /// write set reaches the store and none of its events surface. The
    /// error names the first mismatched key so callers can decide whether
    /// to resubmit.
    pub fn commit(
        &self,
        mut txn: TransactionContext,
        store: &VersionedStore,
    ) -> Result<CommitReceipt> {
        let _commit_guard = self.commit_lock.lock();

        txn.ensure_active()?;

        if let ValidationResult::Conflict { key, conflict } =
            validate_read_set(txn.read_set(), store)
        {
            tracing::debug!(txn = %txn.txn_id(), key = %key, "commit rejected: stale read set");
            txn.mark_aborted(format!("conflict on key {key}"));
            return Err(Error::Conflict {
                key,
                expected: conflict.observed(),
                actual: conflict.current(),
            });
        }

        let committed_at = Utc::now();

        if txn.is_read_only() {
            txn.mark_committed(None);
            let (txn_id, _, events) = txn.into_commit_parts();
            tracing::trace!(txn = %txn_id, "read-only transaction committed");
            return Ok(CommitReceipt {
                txn_id,
                version: None,
                committed_at,
                events,
            });
        }

        let version = self.allocate_version();
        txn.mark_committed(Some(version));
        let (txn_id, write_set, events) = txn.into_commit_parts();

        let batch: Vec<(String, Option<Vec<u8>>)> = write_set
            .into_iter()
            .map(|(key, op)| match op {
                WriteOp::Put(bytes) => (key, Some(bytes)),
                WriteOp::Delete => (key, None),
            })
            .collect();
        let written = batch.len();
        store.apply_batch(batch, version, txn_id, committed_at);

        tracing::debug!(
            txn = %txn_id,
            version = version.counter(),
            keys = written,
            events = events.len(),
            "transaction committed"
        );

        Ok(CommitReceipt {
            txn_id,
            version: Some(version),
            committed_at,
            events,
        })
    }

    /// Explicitly abort a transaction.
    ///
    /// Staged writes and buffered events are discarded; committed state is
    /// untouched.
    pub fn abort(&self, txn: &mut TransactionContext, reason: impl Into<String>) {
        txn.mark_aborted(reason);
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(0)
    }
}
