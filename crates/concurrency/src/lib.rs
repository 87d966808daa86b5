//! Concurrency layer for Tally
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - [`TransactionContext`]: read/write set tracking and event buffering
//! - Snapshot isolation via [`LedgerSnapshot`] (cloned committed state)
//! - Conflict detection at commit time, never at read time
//! - [`TransactionManager`]: the serialized validate-then-apply commit step
//!
//! Transactions execute in parallel against private snapshots and never
//! block each other. The only serialization point is the commit lock held
//! while a transaction's read set is validated and its write set applied.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod snapshot;
pub mod transaction;
pub mod validation;

pub use manager::{CommitReceipt, TransactionManager};
pub use snapshot::LedgerSnapshot;
pub use transaction::{TransactionContext, TransactionStatus, WriteOp};
pub use validation::{validate_read_set, ConflictType, ValidationResult};
