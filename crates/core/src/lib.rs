//! Core types for the Tally ledger
//!
//! This crate defines the vocabulary shared by every layer of the system:
//! - [`types::TxnId`] and [`types::Version`]: transaction identity and commit stamps
//! - [`key::Key`] and [`key::RecordKind`]: the kind-prefixed key scheme
//! - [`record::Record`]: the tagged union of ledger record shapes
//! - [`history::HistoryRecord`]: one entry per committed mutation of a key
//! - [`event::ContractEvent`]: events buffered during execution, released at commit
//! - [`error::Error`]: the unified error taxonomy

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod history;
pub mod key;
pub mod record;
pub mod types;

pub use error::{Error, Result};
pub use event::ContractEvent;
pub use history::HistoryRecord;
pub use key::{Key, RecordKind};
pub use record::{Asset, Course, Record};
pub use types::{TxnId, Version};
