//! Main database entry point for Tally.
//!
//! This module provides the [`Tally`] struct, the primary entry point for
//! all ledger operations, and its builder.

use crate::{AssetContract, CourseContract};
use std::sync::Arc;
use tally_core::{ContractEvent, HistoryRecord, Result, Version};
use tally_engine::{CommitReceipt, Ledger, TransactionContext};

/// The Tally ledger database.
///
/// Create one with [`Tally::in_memory`] or [`Tally::builder`], then reach
/// the contracts through the public fields.
///
/// # Example
///
/// ```ignore
/// use tallydb::prelude::*;
///
/// let db = Tally::in_memory();
///
/// db.assets.create("asset1", "blue", "Kerem")?;
/// db.courses.create_course("CS101", "Algorithms", "30")?;
/// db.courses.register_student("CS101", "student-1")?;
/// ```
pub struct Tally {
    /// The underlying ledger engine.
    inner: Arc<Ledger>,

    /// Asset operations.
    pub assets: AssetContract,

    /// Course operations.
    pub courses: CourseContract,
}

impl Tally {
    /// Create an empty in-memory ledger.
    ///
    /// All state lives in the process; dropping the value loses it. The
    /// surrounding platform owns replication and durability.
    pub fn in_memory() -> Self {
        Self::from_ledger(Arc::new(Ledger::new()))
    }

    /// Create a builder for ledger configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Tally::builder()
    ///     .start_version(100)
    ///     .seed_sample_assets()
    ///     .build()?;
    /// ```
    pub fn builder() -> TallyBuilder {
        TallyBuilder::new()
    }

    fn from_ledger(inner: Arc<Ledger>) -> Self {
        let assets = AssetContract::new(inner.clone());
        let courses = CourseContract::new(inner.clone());
        Tally {
            inner,
            assets,
            courses,
        }
    }

    /// Open a transaction against the latest committed snapshot.
    ///
    /// Pair with [`Tally::commit`] when several contract operations must
    /// share one transaction, or to drive interleavings explicitly.
    pub fn begin(&self) -> TransactionContext {
        self.inner.begin()
    }

    /// Validate and commit a transaction opened with [`Tally::begin`].
    pub fn commit(&self, txn: TransactionContext) -> Result<CommitReceipt> {
        self.inner.commit(txn)
    }

    /// Run `f` inside a transaction and commit if it returns `Ok`.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut TransactionContext) -> Result<T>,
    ) -> Result<T> {
        self.inner.transaction(f)
    }

    /// Register an observer for committed events.
    pub fn subscribe(&self, f: impl Fn(&ContractEvent) + Send + Sync + 'static) {
        self.inner.subscribe(f)
    }

    /// Committed read of a raw ledger key.
    pub fn get_raw(&self, key: &str) -> Option<(Vec<u8>, Version)> {
        self.inner.get(key)
    }

    /// All committed mutations of a raw ledger key, oldest first.
    pub fn history_of(&self, key: &str) -> Vec<HistoryRecord> {
        self.inner.history_of(key)
    }

    /// Current value of the global commit counter.
    pub fn current_version(&self) -> u64 {
        self.inner.current_version()
    }

    /// Shared handle to the underlying ledger engine.
    pub fn ledger(&self) -> Arc<Ledger> {
        self.inner.clone()
    }
}

/// Builder for [`Tally`] configuration.
#[derive(Debug, Default)]
pub struct TallyBuilder {
    start_version: u64,
    seed_sample_assets: bool,
}

impl TallyBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the global commit counter at `version` instead of zero.
    ///
    /// Useful when the surrounding platform dictates where version
    /// numbering resumes.
    pub fn start_version(mut self, version: u64) -> Self {
        self.start_version = version;
        self
    }

    /// Seed the ledger with the three sample assets on build.
    pub fn seed_sample_assets(mut self) -> Self {
        self.seed_sample_assets = true;
        self
    }

    /// Build the ledger.
    pub fn build(self) -> Result<Tally> {
        let db = Tally::from_ledger(Arc::new(Ledger::with_start_version(self.start_version)));
        if self.seed_sample_assets {
            db.assets.init_ledger()?;
        }
        Ok(db)
    }
}
