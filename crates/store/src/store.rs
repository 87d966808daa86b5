//! Versioned key-value storage with per-key history
//!
//! Committed state lives in an ordered map so that kind prefixes form
//! contiguous scan ranges. Each entry carries the commit version that
//! last wrote it; history grows by exactly one record per committed
//! mutation and is never rewritten.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tally_core::{HistoryRecord, TxnId, Version};

/// A committed value and the version that wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedEntry {
    /// Serialized record bytes.
    pub bytes: Vec<u8>,
    /// Commit version of the transaction that wrote this value.
    pub version: Version,
}

/// The committed key space and its history.
///
/// `VersionedStore` is written only through [`apply_batch`], which the
/// commit path calls while holding the commit lock. Reads never block
/// writers for longer than a map clone.
///
/// [`apply_batch`]: VersionedStore::apply_batch
#[derive(Debug, Default)]
pub struct VersionedStore {
    /// Committed entries, ordered for range scans.
    state: RwLock<BTreeMap<String, VersionedEntry>>,
    /// Append-only mutation log per key, oldest first.
    history: RwLock<HashMap<String, Vec<HistoryRecord>>>,
}

impl VersionedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently committed value and version for `key`.
    ///
    /// `None` if the key was never written or its last mutation was a
    /// delete.
    pub fn get(&self, key: &str) -> Option<(Vec<u8>, Version)> {
        self.state
            .read()
            .get(key)
            .map(|entry| (entry.bytes.clone(), entry.version))
    }

    /// Current committed version of `key`, `None` if absent.
    pub fn version_of(&self, key: &str) -> Option<Version> {
        self.state.read().get(key).map(|entry| entry.version)
    }

    /// Clone the committed state as of now.
    ///
    /// The clone is immutable and self-contained: commits that land after
    /// this call are invisible to it. Transaction snapshots and advisory
    /// scans are both built from this.
    pub fn snapshot(&self) -> BTreeMap<String, VersionedEntry> {
        self.state.read().clone()
    }

    /// All committed mutations of `key` in commit order, oldest first.
    ///
    /// Includes tombstones. Empty if the key was never written.
    pub fn history_of(&self, key: &str) -> Vec<HistoryRecord> {
        self.history
            .read()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of live committed keys.
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Whether the committed key space is empty.
    pub fn is_empty(&self) -> bool {
        self.state.read().len() == 0
    }

    /// Apply one validated transaction's writes.
    ///
    /// Every written key is stamped with the same `version`; every
    /// mutation appends a history record. Deletes remove the live entry
    /// and append a tombstone, whether or not the key currently exists.
    ///
    /// Callers must serialize calls to this method (the commit lock does);
    /// the internal locks only guard against concurrent readers.
    pub fn apply_batch(
        &self,
        writes: Vec<(String, Option<Vec<u8>>)>,
        version: Version,
        txn_id: TxnId,
        committed_at: DateTime<Utc>,
    ) {
        let mut writes = writes;
        writes.sort_by(|a, b| a.0.cmp(&b.0));

        let mut state = self.state.write();
        let mut history = self.history.write();
        for (key, op) in writes {
            match op {
                Some(bytes) => {
                    history
                        .entry(key.clone())
                        .or_default()
                        .push(HistoryRecord::write(txn_id, committed_at, bytes.clone()));
                    state.insert(key, VersionedEntry { bytes, version });
                }
                None => {
                    history
                        .entry(key.clone())
                        .or_default()
                        .push(HistoryRecord::tombstone(txn_id, committed_at));
                    state.remove(&key);
                }
            }
        }
        tracing::trace!(version = version.counter(), txn = %txn_id, "applied commit batch");
    }
}
