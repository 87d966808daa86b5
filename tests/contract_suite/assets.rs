//! Asset CRUD, transfer, and query behavior.

use crate::support::db;
use tallydb::prelude::*;

#[test]
fn test_create_then_read_returns_what_was_written() {
    let db = db();
    let created = db.assets.create("asset1", "blue", "Kerem").unwrap();
    let read = db.assets.read("asset1").unwrap();
    assert_eq!(read, created);
}

#[test]
fn test_update_preserves_created_at_and_strictly_advances_updated_at() {
    let db = db();
    let created = db.assets.create("asset1", "blue", "Kerem").unwrap();

    let updated = db.assets.update("asset1", "yellow", "Ayse").unwrap();
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.color, "yellow");
    assert_eq!(updated.owner, "Ayse");
    assert_eq!(updated.id, "asset1");

    let again = db.assets.update("asset1", "green", "Ayse").unwrap();
    assert_eq!(again.created_at, created.created_at);
    assert!(again.updated_at > updated.updated_at);
}

#[test]
fn test_update_missing_asset_is_not_found() {
    let db = db();
    assert!(db
        .assets
        .update("ghost", "red", "nobody")
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_transfer_changes_owner_and_updated_at_only() {
    let db = db();
    let created = db.assets.create("asset1", "blue", "Kerem").unwrap();

    let transferred = db.assets.transfer("asset1", "Ahmet").unwrap();
    assert_eq!(transferred.owner, "Ahmet");
    assert_eq!(transferred.color, created.color);
    assert_eq!(transferred.created_at, created.created_at);
    assert!(transferred.updated_at > created.updated_at);
}

#[test]
fn test_transfer_missing_asset_is_not_found_and_leaves_store_unchanged() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    let version_before = db.current_version();
    let all_before = db.assets.query_all().unwrap();

    assert!(db
        .assets
        .transfer("ghost", "Ahmet")
        .unwrap_err()
        .is_not_found());

    assert_eq!(db.current_version(), version_before);
    assert_eq!(db.assets.query_all().unwrap(), all_before);
}

#[test]
fn test_delete_then_read_is_not_found() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.delete("asset1").unwrap();

    assert!(db.assets.read("asset1").unwrap_err().is_not_found());
    assert!(!db.assets.exists("asset1"));
    assert!(db.assets.delete("asset1").unwrap_err().is_not_found());
}

#[test]
fn test_query_all_sees_only_assets() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.create("asset2", "red", "Ahmet").unwrap();
    db.courses.create_course("CS101", "Algorithms", "30").unwrap();

    let all = db.assets.query_all().unwrap();
    let ids: Vec<_> = all.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["asset1", "asset2"]);
}

#[test]
fn test_query_by_owner_filters_exactly() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.create("asset2", "red", "Ahmet").unwrap();
    db.assets.create("asset3", "green", "Kerem").unwrap();

    let kerems = db.assets.query_by_owner(" Kerem ").unwrap();
    assert_eq!(kerems.len(), 2);
    assert!(kerems.iter().all(|a| a.owner == "Kerem"));

    assert!(db.assets.query_by_owner("Nobody").unwrap().is_empty());
    assert!(matches!(
        db.assets.query_by_owner("  "),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_reads_and_queries_are_idempotent_between_writes() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.create("asset2", "red", "Ahmet").unwrap();

    assert_eq!(
        db.assets.read("asset1").unwrap(),
        db.assets.read("asset1").unwrap()
    );
    assert_eq!(
        db.assets.query_all().unwrap(),
        db.assets.query_all().unwrap()
    );
    assert_eq!(
        db.assets.history("asset1").unwrap(),
        db.assets.history("asset1").unwrap()
    );
}

#[test]
fn test_multiple_operations_share_one_transaction() {
    let db = db();
    let mut txn = db.begin();
    db.assets.create_in(&mut txn, "asset1", "blue", "Kerem").unwrap();
    db.assets.create_in(&mut txn, "asset2", "red", "Ahmet").unwrap();
    let receipt = db.commit(txn).unwrap();

    assert_eq!(db.current_version(), 1, "one commit for both creates");
    assert_eq!(receipt.version.unwrap().counter(), 1);
    assert_eq!(db.assets.query_all().unwrap().len(), 2);
}
