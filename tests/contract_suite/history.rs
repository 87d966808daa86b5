//! Change-history projection.

use crate::support::db;

#[test]
fn test_history_records_create_update_delete_in_order() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.update("asset1", "yellow", "Kerem").unwrap();
    db.assets.delete("asset1").unwrap();

    let history = db.assets.history("asset1").unwrap();
    assert_eq!(history.len(), 3);

    assert!(!history[0].is_delete);
    assert_eq!(history[0].asset.as_ref().unwrap().color, "blue");

    assert!(!history[1].is_delete);
    assert_eq!(history[1].asset.as_ref().unwrap().color, "yellow");

    assert!(history[2].is_delete, "the last entry is a tombstone");
    assert!(history[2].asset.is_none(), "tombstones carry no value");

    assert!(
        history.windows(2).all(|w| w[0].committed_at <= w[1].committed_at),
        "history is ordered by commit time"
    );
}

#[test]
fn test_history_of_unwritten_id_is_empty() {
    let db = db();
    assert!(db.assets.history("never-written").unwrap().is_empty());
}

#[test]
fn test_history_survives_deletion_of_the_record() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.delete("asset1").unwrap();

    assert!(db.assets.read("asset1").unwrap_err().is_not_found());
    assert_eq!(db.assets.history("asset1").unwrap().len(), 2);
}

#[test]
fn test_recreation_appends_to_the_same_history() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.delete("asset1").unwrap();
    db.assets.create("asset1", "red", "Ahmet").unwrap();

    let history = db.assets.history("asset1").unwrap();
    assert_eq!(history.len(), 3);
    assert!(history[1].is_delete);
    assert_eq!(history[2].asset.as_ref().unwrap().owner, "Ahmet");
}

#[test]
fn test_each_entry_names_its_transaction() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();
    db.assets.update("asset1", "red", "Kerem").unwrap();

    let history = db.assets.history("asset1").unwrap();
    assert_ne!(
        history[0].txn_id, history[1].txn_id,
        "separate invocations commit under separate transaction ids"
    );
}

#[test]
fn test_history_is_stable_between_writes() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();

    let first = db.assets.history("asset1").unwrap();
    let second = db.assets.history("asset1").unwrap();
    assert_eq!(first, second);
}
