//! Convenient imports for Tally.
//!
//! Re-exports the most commonly used types so you can get started with a
//! single import:
//!
//! ```ignore
//! use tallydb::prelude::*;
//!
//! let db = Tally::in_memory();
//! db.assets.create("asset1", "blue", "Kerem")?;
//! ```

// Main entry point
pub use crate::database::{Tally, TallyBuilder};

// Error handling
pub use crate::{Error, Result};

// Contracts
pub use crate::{AssetContract, AssetHistoryEntry, CourseContract};

// Core types
pub use crate::{Asset, ContractEvent, Course, HistoryRecord, Key, Record, RecordKind};

// Transaction types
pub use crate::{CommitReceipt, TransactionContext, TxnId, Version};

// Re-export serde_json for convenience
pub use serde_json::json;
