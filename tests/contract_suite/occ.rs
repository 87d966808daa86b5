//! Commit-time conflict behavior
//!
//! The tests here drive interleavings explicitly: two transactions are
//! opened against the same committed snapshot, both run their logic, and
//! commit order decides the winner. The loser must be rejected whole.

use crate::support::{collect_events, db};
use std::sync::atomic::{AtomicU32, Ordering};
use tallydb::prelude::*;

#[test]
fn test_two_registrations_from_one_snapshot_one_wins() {
    let db = db();
    db.courses.create_course("C1", "Algo", "5").unwrap();
    for i in 0..4 {
        db.courses
            .register_student("C1", &format!("student-{i}"))
            .unwrap();
    }

    // both transactions observe enrolled = 4, quota = 5
    let mut first = db.begin();
    let mut second = db.begin();
    db.courses
        .register_student_in(&mut first, "C1", "alice")
        .unwrap();
    db.courses
        .register_student_in(&mut second, "C1", "bob")
        .unwrap();

    db.commit(first).unwrap();
    let err = db.commit(second).unwrap_err();

    assert!(err.is_conflict());
    assert!(matches!(err, Error::Conflict { ref key, .. } if key == "course:C1"));
    assert_eq!(db.courses.get_course("C1").unwrap().enrolled, 5);
}

#[test]
fn test_conflicted_registration_resubmits_against_fresh_state() {
    let db = db();
    db.courses.create_course("C1", "Algo", "1").unwrap();

    let mut first = db.begin();
    let mut second = db.begin();
    db.courses
        .register_student_in(&mut first, "C1", "alice")
        .unwrap();
    db.courses
        .register_student_in(&mut second, "C1", "bob")
        .unwrap();

    db.commit(first).unwrap();
    let err = db.commit(second).unwrap_err();
    assert!(err.is_retryable());

    // resubmission re-runs the checks against fresh state: now full
    assert!(matches!(
        db.courses.register_student("C1", "bob"),
        Err(Error::QuotaExceeded { .. })
    ));
    assert_eq!(db.courses.get_course("C1").unwrap().enrolled, 1);
}

#[test]
fn test_conflicting_registration_leaks_no_event() {
    let db = db();
    db.courses.create_course("C1", "Algo", "5").unwrap();
    let events = collect_events(&db);

    let mut first = db.begin();
    let mut second = db.begin();
    db.courses
        .register_student_in(&mut first, "C1", "alice")
        .unwrap();
    db.courses
        .register_student_in(&mut second, "C1", "bob")
        .unwrap();

    db.commit(first).unwrap();
    assert!(db.commit(second).is_err());

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1, "only the winner's event is delivered");
    assert_eq!(events[0].payload["student_id"], "alice");
}

#[test]
fn test_concurrent_create_of_same_id_conflicts() {
    let db = db();

    // both observe the id as absent
    let mut first = db.begin();
    let mut second = db.begin();
    db.assets
        .create_in(&mut first, "asset1", "blue", "Kerem")
        .unwrap();
    db.assets
        .create_in(&mut second, "asset1", "red", "Ahmet")
        .unwrap();

    db.commit(first).unwrap();
    let err = db.commit(second).unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(db.assets.read("asset1").unwrap().owner, "Kerem");
}

#[test]
fn test_update_and_delete_of_same_asset_conflict() {
    let db = db();
    db.assets.create("asset1", "blue", "Kerem").unwrap();

    let mut updater = db.begin();
    let mut deleter = db.begin();
    db.assets
        .update_in(&mut updater, "asset1", "green", "Kerem")
        .unwrap();
    db.assets.delete_in(&mut deleter, "asset1").unwrap();

    db.commit(updater).unwrap();
    assert!(db.commit(deleter).unwrap_err().is_conflict());

    assert_eq!(db.assets.read("asset1").unwrap().color, "green");
}

#[test]
fn test_abandoned_transaction_has_no_observable_effect() {
    let db = db();
    db.courses.create_course("C1", "Algo", "5").unwrap();
    let events = collect_events(&db);

    {
        let mut txn = db.begin();
        db.courses
            .register_student_in(&mut txn, "C1", "ghost")
            .unwrap();
        // dropped without commit
    }

    assert_eq!(db.courses.get_course("C1").unwrap().enrolled, 0);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_disjoint_transactions_do_not_conflict() {
    let db = db();
    db.courses.create_course("C1", "Algo", "5").unwrap();
    db.courses.create_course("C2", "Logic", "5").unwrap();

    let mut first = db.begin();
    let mut second = db.begin();
    db.courses
        .register_student_in(&mut first, "C1", "alice")
        .unwrap();
    db.courses
        .register_student_in(&mut second, "C2", "bob")
        .unwrap();

    db.commit(first).unwrap();
    db.commit(second).unwrap();

    assert_eq!(db.courses.get_course("C1").unwrap().enrolled, 1);
    assert_eq!(db.courses.get_course("C2").unwrap().enrolled, 1);
}

#[test]
fn test_registration_storm_fills_course_to_exactly_quota() {
    let db = db();
    db.courses.create_course("C1", "Algo", "5").unwrap();

    let admitted = AtomicU32::new(0);
    let turned_away = AtomicU32::new(0);

    std::thread::scope(|scope| {
        for student in 0..8 {
            let courses = db.courses.clone();
            let admitted = &admitted;
            let turned_away = &turned_away;
            scope.spawn(move || {
                let student_id = format!("student-{student}");
                loop {
                    match courses.register_student("C1", &student_id) {
                        Ok(_) => {
                            admitted.fetch_add(1, Ordering::SeqCst);
                            break;
                        }
                        Err(err) if err.is_retryable() => continue,
                        Err(Error::QuotaExceeded { .. }) => {
                            turned_away.fetch_add(1, Ordering::SeqCst);
                            break;
                        }
                        Err(err) => panic!("unexpected error: {err}"),
                    }
                }
            });
        }
    });

    assert_eq!(admitted.load(Ordering::SeqCst), 5);
    assert_eq!(turned_away.load(Ordering::SeqCst), 3);
    assert_eq!(db.courses.get_course("C1").unwrap().enrolled, 5);
}
