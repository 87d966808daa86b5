//! Cloned snapshot of committed state
//!
//! A transaction executes against an immutable clone of the committed key
//! space taken when the transaction opens. Commits that land afterwards
//! are invisible to it, which is what makes reads repeatable without any
//! locking during execution.

use std::collections::BTreeMap;
use std::ops::Bound;
use tally_store::VersionedEntry;

/// Immutable view of committed state at one point in time.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    entries: BTreeMap<String, VersionedEntry>,
}

impl LedgerSnapshot {
    /// Wrap a cloned committed map.
    pub fn new(entries: BTreeMap<String, VersionedEntry>) -> Self {
        LedgerSnapshot { entries }
    }

    /// Committed entry for `key` as of snapshot time.
    pub fn get(&self, key: &str) -> Option<&VersionedEntry> {
        self.entries.get(key)
    }

    /// Whether `key` existed at snapshot time.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Ordered iteration over `[start, end)`.
    ///
    /// An empty `start` means from the beginning; an empty `end` means to
    /// the end of the key space. The iterator is finite and restartable:
    /// calling again yields the same sequence.
    pub fn range<'a>(
        &'a self,
        start: &'a str,
        end: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a VersionedEntry)> + 'a {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        self.entries
            .range::<str, _>((lower, upper))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Ordered iteration over every key starting with `prefix`.
    pub fn scan_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a VersionedEntry)> + 'a {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of keys in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
