//! Identifier types for the ledger
//!
//! This module defines the two stamps that version the committed key space:
//! - [`TxnId`]: unique identifier for one transaction invocation
//! - [`Version`]: monotonically increasing commit stamp assigned to written keys

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a transaction invocation.
///
/// Assigned when a transaction context is opened. It travels with the
/// transaction through commit and into the history record of every key
/// the transaction mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxnId(Uuid);

impl TxnId {
    /// Create a new random TxnId using UUID v4.
    pub fn new() -> Self {
        TxnId(Uuid::new_v4())
    }

    /// Create a TxnId from raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        TxnId(Uuid::from_bytes(bytes))
    }

    /// Get the raw byte representation.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for TxnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TxnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commit stamp for a key.
///
/// A key's version changes only when a validated transaction commits a
/// write to it. Every key written by one transaction carries the same
/// version: one greater than the global commit counter at validation time.
/// Versions are compared, never interpreted; gaps are legal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// Wrap a raw counter value.
    pub const fn new(counter: u64) -> Self {
        Version(counter)
    }

    /// Get the raw counter value.
    pub const fn counter(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}
