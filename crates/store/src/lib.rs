//! Committed state for the Tally ledger
//!
//! This crate owns the only shared mutable resource in the system: the
//! committed key space and its append-only history. Nothing here knows
//! about transactions; the OCC layer validates against this store and
//! applies write batches through [`VersionedStore::apply_batch`], which is
//! the single mutation path into committed state.

#![warn(missing_docs)]

pub mod store;

pub use store::{VersionedEntry, VersionedStore};
