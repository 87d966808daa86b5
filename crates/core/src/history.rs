//! Per-key change history
//!
//! Every committed mutation of a key appends one [`HistoryRecord`] to that
//! key's history. The history is append-only and never trimmed; a delete
//! appends a tombstone rather than erasing anything, so absence after a
//! delete is distinguishable from a key that never existed.

use crate::types::TxnId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed mutation of a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The transaction that committed this mutation.
    pub txn_id: TxnId,
    /// When the mutation committed.
    pub committed_at: DateTime<Utc>,
    /// Whether this entry is a tombstone.
    pub is_delete: bool,
    /// The value written, absent for tombstones.
    pub value: Option<Vec<u8>>,
}

impl HistoryRecord {
    /// History entry for a committed write.
    pub fn write(txn_id: TxnId, committed_at: DateTime<Utc>, value: Vec<u8>) -> Self {
        HistoryRecord {
            txn_id,
            committed_at,
            is_delete: false,
            value: Some(value),
        }
    }

    /// Tombstone entry for a committed delete.
    pub fn tombstone(txn_id: TxnId, committed_at: DateTime<Utc>) -> Self {
        HistoryRecord {
            txn_id,
            committed_at,
            is_delete: true,
            value: None,
        }
    }
}
