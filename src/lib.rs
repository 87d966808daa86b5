//! # Tally
//!
//! Embedded versioned key-value ledger with optimistic concurrency for
//! deterministic contract logic.
//!
//! Tally stores records in one versioned key space, keeps a full
//! append-only history per key, and runs business logic inside
//! transactions that execute against immutable snapshots. Conflicts are
//! detected when a transaction commits, never while it executes: a
//! transaction that read state which changed under it is rejected whole,
//! with no partial writes and no leaked events, and the caller decides
//! whether to resubmit.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tallydb::prelude::*;
//!
//! let db = Tally::in_memory();
//!
//! // Asset CRUD
//! db.assets.create("asset1", "blue", "Kerem")?;
//! let asset = db.assets.read("asset1")?;
//! db.assets.transfer("asset1", "Ahmet")?;
//!
//! // Quota-bounded registration
//! db.courses.create_course("CS101", "Algorithms", "30")?;
//! db.courses.register_student("CS101", "student-1")?;
//! ```
//!
//! ## Contracts
//!
//! - [`AssetContract`] - CRUD, ownership transfer, queries, history
//! - [`CourseContract`] - course creation and quota-bounded registration
//!
//! ## Concurrency
//!
//! Open transactions explicitly with [`Tally::begin`] to interleave
//! several in flight; exactly one of two transactions that read the same
//! pre-state will commit, the other gets a retryable
//! [`Error::Conflict`](crate::Error).

#![warn(missing_docs)]

mod database;

pub mod prelude;

// Main entry points
pub use database::{Tally, TallyBuilder};

// Error handling
pub use tally_core::{Error, Result};

// Contracts
pub use tally_contracts::{AssetContract, AssetHistoryEntry, CourseContract};

// Core types
pub use tally_core::{
    Asset, ContractEvent, Course, HistoryRecord, Key, Record, RecordKind, TxnId, Version,
};

// Engine types
pub use tally_engine::{CommitReceipt, Ledger, TransactionContext, TransactionStatus};
