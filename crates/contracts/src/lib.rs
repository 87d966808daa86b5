//! Contract logic for the Tally ledger
//!
//! Two contracts ship with the ledger:
//! - [`AssetContract`]: CRUD, ownership transfer, queries, and full
//!   change history for asset records
//! - [`CourseContract`]: course creation and quota-bounded student
//!   registration, where optimistic conflict detection is what keeps the
//!   quota invariant honest under concurrent submission
//!
//! Contracts are stateless facades holding `Arc<Ledger>`. Every mutating
//! operation runs in its own transaction; each also has a public `*_in`
//! variant taking an explicit [`tally_engine::TransactionContext`] so
//! several operations can share one transaction and tests can drive
//! deterministic interleavings.

#![warn(missing_docs)]

pub mod asset;
pub mod course;

pub use asset::{AssetContract, AssetHistoryEntry};
pub use course::CourseContract;

pub(crate) mod args {
    use tally_core::{Error, Result};

    /// Trim a required string argument, rejecting empty input before any
    /// ledger read.
    pub(crate) fn require(name: &str, raw: &str) -> Result<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(Error::InvalidArgument(format!(
                "{name} is required and must be a non-empty string"
            )))
        } else {
            Ok(trimmed.to_string())
        }
    }

}
