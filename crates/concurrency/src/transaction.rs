//! Transaction context: read/write set tracking
//!
//! A [`TransactionContext`] binds one contract invocation to a snapshot of
//! committed state. Reads go to the snapshot and record the observed
//! version (or observed absence) into the read set; writes and deletes are
//! staged into the write set and touch nothing shared until commit.
//!
//! Reads never see the transaction's own staged writes: the context
//! reproduces snapshot-read semantics, so a `get` after a `put` of the
//! same key still returns the committed value from snapshot time. Contract
//! logic is written read-then-write and does not rely on read-your-writes.

use crate::snapshot::LedgerSnapshot;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use tally_core::{ContractEvent, Error, Result, TxnId, Version};

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionStatus {
    /// Executing; reads and writes may be staged.
    Active,
    /// Validated and applied. Read-only transactions commit without a
    /// version.
    Committed {
        /// Commit version assigned to the write set, if any.
        version: Option<Version>,
    },
    /// Discarded; nothing was applied and no events escaped.
    Aborted {
        /// Human-readable reason.
        reason: String,
    },
}

/// A staged mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Stage a value write.
    Put(Vec<u8>),
    /// Stage a delete tombstone.
    Delete,
}

/// Per-invocation transaction handle.
///
/// Owns its read set, write set, and event buffer for the lifetime of one
/// invocation; none of them are shared or persisted. Dropping an active
/// context abandons the transaction with no observable effect.
#[derive(Debug)]
pub struct TransactionContext {
    txn_id: TxnId,
    opened_at: DateTime<Utc>,
    snapshot: LedgerSnapshot,
    read_set: FxHashMap<String, Option<Version>>,
    write_set: FxHashMap<String, WriteOp>,
    events: Vec<ContractEvent>,
    status: TransactionStatus,
}

impl TransactionContext {
    /// Open a transaction against a snapshot of committed state.
    pub fn open(snapshot: LedgerSnapshot) -> Self {
        TransactionContext {
            txn_id: TxnId::new(),
            opened_at: Utc::now(),
            snapshot,
            read_set: FxHashMap::default(),
            write_set: FxHashMap::default(),
            events: Vec::new(),
            status: TransactionStatus::Active,
        }
    }

    /// This transaction's identifier.
    pub fn txn_id(&self) -> TxnId {
        self.txn_id
    }

    /// When the snapshot was taken.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Current lifecycle state.
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Read a key from the snapshot, recording it into the read set.
    ///
    /// The first observation of a key wins: its version (or absence) is
    /// what commit validation will check. Because the snapshot is
    /// immutable, repeated reads of the same key always return the same
    /// value within one transaction.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_active()?;
        let entry = self.snapshot.get(key);
        self.read_set
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|e| e.version));
        Ok(entry.map(|e| e.bytes.clone()))
    }

    /// Stage a write. Last write to a key wins.
    pub fn put(&mut self, key: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        self.ensure_active()?;
        self.write_set.insert(key.into(), WriteOp::Put(bytes));
        Ok(())
    }

    /// Stage a delete. Last write to a key wins.
    pub fn delete(&mut self, key: impl Into<String>) -> Result<()> {
        self.ensure_active()?;
        self.write_set.insert(key.into(), WriteOp::Delete);
        Ok(())
    }

    /// Buffer an event for delivery after a successful commit.
    ///
    /// Events of an aborted transaction are discarded with it.
    pub fn emit(&mut self, event: ContractEvent) {
        self.events.push(event);
    }

    /// Advisory scan over the snapshot.
    ///
    /// Scans do not participate in the read set and therefore never cause
    /// conflicts; result sets are reporting data, not transactional
    /// preconditions.
    pub fn scan_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [u8])> + 'a {
        self.snapshot
            .scan_prefix(prefix)
            .map(|(key, entry)| (key, entry.bytes.as_slice()))
    }

    /// Advisory range scan over the snapshot, `[start, end)`, empty bound
    /// meaning unbounded.
    pub fn range<'a>(
        &'a self,
        start: &'a str,
        end: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [u8])> + 'a {
        self.snapshot
            .range(start, end)
            .map(|(key, entry)| (key, entry.bytes.as_slice()))
    }

    /// The keys and versions this transaction observed.
    pub fn read_set(&self) -> &FxHashMap<String, Option<Version>> {
        &self.read_set
    }

    /// Whether nothing has been staged for write.
    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty()
    }

    /// Number of buffered events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Mark the transaction aborted. Staged writes and events die here.
    pub fn mark_aborted(&mut self, reason: impl Into<String>) {
        self.status = TransactionStatus::Aborted {
            reason: reason.into(),
        };
    }

    pub(crate) fn ensure_active(&self) -> Result<()> {
        match &self.status {
            TransactionStatus::Active => Ok(()),
            other => Err(Error::Internal(format!(
                "transaction {} is no longer active: {:?}",
                self.txn_id, other
            ))),
        }
    }

    pub(crate) fn mark_committed(&mut self, version: Option<Version>) {
        self.status = TransactionStatus::Committed { version };
    }

    /// Tear down into the pieces the commit step applies.
    pub(crate) fn into_commit_parts(
        self,
    ) -> (TxnId, FxHashMap<String, WriteOp>, Vec<ContractEvent>) {
        (self.txn_id, self.write_set, self.events)
    }
}
