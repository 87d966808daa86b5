//! Asset contract: CRUD, transfer, queries, history
//!
//! Mutations run read-then-write inside a transaction, so their
//! existence checks land in the read set and concurrent mutations of the
//! same asset conflict at commit instead of silently overwriting each
//! other. Reads and queries take the fast path over committed state: they
//! open no transaction and never conflict, since their results are
//! reporting data rather than transactional preconditions.

use crate::args;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tally_core::{Asset, Error, Key, Record, RecordKind, Result, TxnId};
use tally_engine::{Ledger, TransactionContext};

/// One entry of an asset's change history.
///
/// Tombstones mark committed deletes and carry no value; absence of a key
/// is thereby distinguishable from a key that never existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHistoryEntry {
    /// The transaction that committed this mutation.
    pub txn_id: TxnId,
    /// When the mutation committed.
    pub committed_at: DateTime<Utc>,
    /// Whether this entry records a delete.
    pub is_delete: bool,
    /// The asset as written, absent for tombstones.
    pub asset: Option<Asset>,
}

/// Asset operations.
///
/// Stateless facade over a shared [`Ledger`].
#[derive(Clone)]
pub struct AssetContract {
    ledger: Arc<Ledger>,
}

impl AssetContract {
    /// Create a contract facade over `ledger`.
    pub fn new(ledger: Arc<Ledger>) -> Self {
        AssetContract { ledger }
    }

    /// Seed the ledger with the three sample assets.
    ///
    /// Writes unconditionally, overwriting same-id records if present.
    pub fn init_ledger(&self) -> Result<Vec<Asset>> {
        let samples = [
            ("asset1", "blue", "Kerem"),
            ("asset2", "red", "Ahmet"),
            ("asset3", "green", "Mehmet"),
        ];
        self.ledger.transaction(|txn| {
            let mut seeded = Vec::with_capacity(samples.len());
            for (id, color, owner) in samples {
                let asset = Asset::new(id, color, owner);
                txn.put(
                    Key::asset(id).qualified(),
                    Record::Asset(asset.clone()).to_bytes()?,
                )?;
                seeded.push(asset);
            }
            tracing::info!(count = seeded.len(), "ledger seeded with sample assets");
            Ok(seeded)
        })
    }

    /// Create a new asset. Fails with `AlreadyExists` if the id is taken.
    pub fn create(&self, id: &str, color: &str, owner: &str) -> Result<Asset> {
        self.ledger
            .transaction(|txn| self.create_in(txn, id, color, owner))
    }

    /// Create inside an existing transaction.
    ///
    /// The existence check reads (and records) the key's absence, so a
    /// concurrent create of the same id conflicts at commit.
    pub fn create_in(
        &self,
        txn: &mut TransactionContext,
        id: &str,
        color: &str,
        owner: &str,
    ) -> Result<Asset> {
        let id = args::require("asset id", id)?;
        let color = args::require("asset color", color)?;
        let owner = args::require("asset owner", owner)?;

        let key = Key::asset(&id).qualified();
        if txn.get(&key)?.is_some() {
            return Err(Error::AlreadyExists(format!("asset {id}")));
        }

        let asset = Asset::new(id, color, owner);
        txn.put(key, Record::Asset(asset.clone()).to_bytes()?)?;
        tracing::info!(id = %asset.id, owner = %asset.owner, "asset created");
        Ok(asset)
    }

    /// Read an asset from committed state. Fails with `NotFound` if absent.
    pub fn read(&self, id: &str) -> Result<Asset> {
        let id = args::require("asset id", id)?;
        let key = Key::asset(&id).qualified();
        match self.ledger.get(&key) {
            Some((bytes, _)) => Record::from_bytes(&bytes)?.into_asset(),
            None => Err(Error::NotFound(format!("asset {id}"))),
        }
    }

    /// Replace an asset's color and owner. Fails with `NotFound` if absent.
    pub fn update(&self, id: &str, color: &str, owner: &str) -> Result<Asset> {
        self.ledger
            .transaction(|txn| self.update_in(txn, id, color, owner))
    }

    /// Update inside an existing transaction.
    ///
    /// `created_at` is preserved; `updated_at` strictly advances.
    pub fn update_in(
        &self,
        txn: &mut TransactionContext,
        id: &str,
        color: &str,
        owner: &str,
    ) -> Result<Asset> {
        let id = args::require("asset id", id)?;
        let color = args::require("asset color", color)?;
        let owner = args::require("asset owner", owner)?;

        let key = Key::asset(&id).qualified();
        let bytes = txn
            .get(&key)?
            .ok_or_else(|| Error::NotFound(format!("asset {id}")))?;
        let mut asset = Record::from_bytes(&bytes)?.into_asset()?;

        asset.color = color;
        asset.owner = owner;
        asset.touch();

        txn.put(key, Record::Asset(asset.clone()).to_bytes()?)?;
        tracing::info!(id = %asset.id, "asset updated");
        Ok(asset)
    }

    /// Delete an asset. Fails with `NotFound` if absent.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.ledger.transaction(|txn| self.delete_in(txn, id))
    }

    /// Delete inside an existing transaction. Stages a tombstone.
    pub fn delete_in(&self, txn: &mut TransactionContext, id: &str) -> Result<()> {
        let id = args::require("asset id", id)?;
        let key = Key::asset(&id).qualified();
        if txn.get(&key)?.is_none() {
            return Err(Error::NotFound(format!("asset {id}")));
        }
        txn.delete(key)?;
        tracing::info!(id = %id, "asset deleted");
        Ok(())
    }

    /// Transfer ownership. Mutates owner and `updated_at` only.
    pub fn transfer(&self, id: &str, new_owner: &str) -> Result<Asset> {
        self.ledger
            .transaction(|txn| self.transfer_in(txn, id, new_owner))
    }

    /// Transfer inside an existing transaction.
    pub fn transfer_in(
        &self,
        txn: &mut TransactionContext,
        id: &str,
        new_owner: &str,
    ) -> Result<Asset> {
        let id = args::require("asset id", id)?;
        let new_owner = args::require("new owner", new_owner)?;

        let key = Key::asset(&id).qualified();
        let bytes = txn
            .get(&key)?
            .ok_or_else(|| Error::NotFound(format!("asset {id}")))?;
        let mut asset = Record::from_bytes(&bytes)?.into_asset()?;

        let old_owner = std::mem::replace(&mut asset.owner, new_owner);
        asset.touch();

        txn.put(key, Record::Asset(asset.clone()).to_bytes()?)?;
        tracing::info!(id = %asset.id, from = %old_owner, to = %asset.owner, "asset transferred");
        Ok(asset)
    }

    /// Whether an asset exists in committed state.
    ///
    /// Never errors: blank input reads as "does not exist".
    pub fn exists(&self, id: &str) -> bool {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.ledger.get(&Key::asset(trimmed).qualified()).is_some()
    }

    /// All committed assets as of scan start.
    ///
    /// Advisory snapshot scan: reflects committed data only and does not
    /// participate in conflict detection. Undecodable entries are logged
    /// and skipped.
    pub fn query_all(&self) -> Result<Vec<Asset>> {
        let snapshot = self.ledger.snapshot();
        let mut assets = Vec::new();
        for (key, entry) in snapshot.scan_prefix(RecordKind::Asset.prefix()) {
            match Record::from_bytes(&entry.bytes).and_then(Record::into_asset) {
                Ok(asset) => assets.push(asset),
                Err(err) => {
                    tracing::warn!(key, error = %err, "skipping undecodable record in scan")
                }
            }
        }
        tracing::debug!(count = assets.len(), "asset scan complete");
        Ok(assets)
    }

    /// All committed assets held by `owner` as of scan start.
    pub fn query_by_owner(&self, owner: &str) -> Result<Vec<Asset>> {
        let owner = args::require("asset owner", owner)?;
        let mut assets = self.query_all()?;
        assets.retain(|asset| asset.owner == owner);
        Ok(assets)
    }

    /// Full change history of an asset, oldest first, tombstones included.
    ///
    /// Empty if the id was never written. Deleted assets keep their
    /// history; the final entry is a valueless tombstone.
    pub fn history(&self, id: &str) -> Result<Vec<AssetHistoryEntry>> {
        let id = args::require("asset id", id)?;
        let key = Key::asset(&id).qualified();
        let entries = self
            .ledger
            .history_of(&key)
            .into_iter()
            .map(|record| {
                let asset = record.value.as_deref().and_then(|bytes| {
                    match Record::from_bytes(bytes).and_then(Record::into_asset) {
                        Ok(asset) => Some(asset),
                        Err(err) => {
                            tracing::warn!(key = %key, error = %err, "undecodable history value");
                            None
                        }
                    }
                });
                AssetHistoryEntry {
                    txn_id: record.txn_id,
                    committed_at: record.committed_at,
                    is_delete: record.is_delete,
                    asset,
                }
            })
            .collect();
        Ok(entries)
    }
}
