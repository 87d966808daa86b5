//! Ledger engine for Tally
//!
//! [`Ledger`] owns the committed store and the transaction manager and is
//! the surface everything above builds on: open a transaction against the
//! latest committed snapshot, run logic, commit atomically, and deliver
//! buffered events to subscribers once the commit sticks.

#![warn(missing_docs)]

pub mod ledger;

pub use ledger::Ledger;

// Re-exported so callers of the engine don't need to depend on the
// concurrency crate directly.
pub use tally_concurrency::{CommitReceipt, TransactionContext, TransactionStatus};
