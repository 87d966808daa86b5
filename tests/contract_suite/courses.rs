//! Course creation, registration rules, and event delivery.

use crate::support::{collect_events, db};
use tallydb::prelude::*;

#[test]
fn test_course_created_event_carries_the_full_record() {
    let db = db();
    let events = collect_events(&db);

    db.courses.create_course("CS101", "Algorithms", "30").unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "CourseCreated");
    assert_eq!(events[0].payload["code"], "CS101");
    assert_eq!(events[0].payload["quota"], 30);
    assert_eq!(events[0].payload["enrolled"], 0);
    assert_eq!(events[0].payload["active"], true);
}

#[test]
fn test_student_registered_event_payload() {
    let db = db();
    db.courses.create_course("CS101", "Algorithms", "30").unwrap();
    let events = collect_events(&db);

    db.courses.register_student("CS101", "student-7").unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "StudentRegistered");
    assert_eq!(events[0].payload["code"], "CS101");
    assert_eq!(events[0].payload["student_id"], "student-7");
    assert_eq!(events[0].payload["enrolled"], 1);
}

#[test]
fn test_failed_registration_emits_nothing() {
    let db = db();
    db.courses.create_course("C1", "Algo", "0").unwrap();
    let events = collect_events(&db);

    assert!(db.courses.register_student("C1", "S1").is_err());
    assert!(db.courses.register_student("missing", "S1").is_err());

    assert!(
        events.lock().unwrap().is_empty(),
        "aborted transactions must not leak events"
    );
}

#[test]
fn test_zero_quota_boundary() {
    let db = db();
    db.courses.create_course("C1", "Algo", "0").unwrap();

    let err = db.courses.register_student("C1", "S1").unwrap_err();
    assert!(matches!(
        err,
        Error::QuotaExceeded {
            enrolled: 0,
            quota: 0,
            ..
        }
    ));
    assert_eq!(db.courses.get_course("C1").unwrap().enrolled, 0);
}

#[test]
fn test_registration_counts_up_to_quota_then_stops() {
    let db = db();
    db.courses.create_course("C1", "Algo", "3").unwrap();

    for expected in 1..=3u32 {
        let course = db
            .courses
            .register_student("C1", &format!("student-{expected}"))
            .unwrap();
        assert_eq!(course.enrolled, expected);
    }

    assert!(matches!(
        db.courses.register_student("C1", "student-4"),
        Err(Error::QuotaExceeded { enrolled: 3, quota: 3, .. })
    ));
}

#[test]
fn test_closing_a_course_blocks_registration_until_reopened() {
    let db = db();
    db.courses.create_course("C1", "Algo", "10").unwrap();

    db.courses.set_active("C1", false).unwrap();
    assert!(matches!(
        db.courses.register_student("C1", "S1"),
        Err(Error::InactiveCourse(_))
    ));

    db.courses.set_active("C1", true).unwrap();
    assert_eq!(db.courses.register_student("C1", "S1").unwrap().enrolled, 1);
}

#[test]
fn test_get_course_reflects_committed_state() {
    let db = db();
    db.courses.create_course("C1", "Algo", "5").unwrap();
    db.courses.register_student("C1", "S1").unwrap();

    let course = db.courses.get_course(" C1 ").unwrap();
    assert_eq!(course.enrolled, 1);
    assert_eq!(course.name, "Algo");

    assert!(db.courses.get_course("NOPE").unwrap_err().is_not_found());
}

#[test]
fn test_course_and_asset_ids_do_not_collide() {
    let db = db();
    db.assets.create("X", "red", "Ada").unwrap();
    db.courses.create_course("X", "Same id, different kind", "1").unwrap();

    assert_eq!(db.assets.read("X").unwrap().color, "red");
    assert_eq!(db.courses.get_course("X").unwrap().quota, 1);
}
