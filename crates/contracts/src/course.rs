//! Course contract: quota-bounded registration
//!
//! Registration is deliberately written read-check-increment with no
//! locking: the read of `enrolled` lands in the transaction's read set,
//! so two registrations simulated against the same snapshot cannot both
//! commit. The second one's read set is stale by the time it validates
//! and the whole transaction is rejected with `Conflict` for the caller
//! to resubmit. That rejection, not blocking, is what keeps
//! `enrolled <= quota` true at every committed state.

use crate::args;
use serde_json::json;
use std::sync::Arc;
use tally_core::{ContractEvent, Course, Error, Key, Record, Result};
use tally_engine::{Ledger, TransactionContext};

/// Course operations.
///
/// Stateless facade over a shared [`Ledger`].
#[derive(Clone)]
pub struct CourseContract {
    ledger: Arc<Ledger>,
}

impl CourseContract {
    /// Create a contract facade over `ledger`.
    pub fn new(ledger: Arc<Ledger>) -> Self {
        CourseContract { ledger }
    }

    /// Create a new course, open for registration with zero enrollment.
    ///
    /// `quota` arrives as a positional string argument and must parse to
    /// a non-negative integer. Emits `CourseCreated` on commit.
    pub fn create_course(&self, code: &str, name: &str, quota: &str) -> Result<Course> {
        self.ledger
            .transaction(|txn| self.create_course_in(txn, code, name, quota))
    }

    /// Create a course inside an existing transaction.
    pub fn create_course_in(
        &self,
        txn: &mut TransactionContext,
        code: &str,
        name: &str,
        quota: &str,
    ) -> Result<Course> {
        let code = args::require("course code", code)?;
        let name = args::require("course name", name)?;
        let quota = parse_quota(quota)?;

        let key = Key::course(&code).qualified();
        if txn.get(&key)?.is_some() {
            return Err(Error::AlreadyExists(format!("course {code}")));
        }

        let course = Course::new(code, name, quota);
        txn.put(key, Record::Course(course.clone()).to_bytes()?)?;
        txn.emit(ContractEvent::new(
            "CourseCreated",
            serde_json::to_value(&course)?,
        ));
        tracing::info!(code = %course.code, quota = course.quota, "course created");
        Ok(course)
    }

    /// Register a student, taking one seat.
    ///
    /// Fails with `NotFound` if the course is absent, `InactiveCourse` if
    /// it is closed, `QuotaExceeded` if every seat is taken. Emits
    /// `StudentRegistered` on commit. A concurrent registration against
    /// the same pre-state surfaces as `Conflict` at commit; resubmission
    /// re-runs the checks against fresh state.
    pub fn register_student(&self, code: &str, student_id: &str) -> Result<Course> {
        self.ledger
            .transaction(|txn| self.register_student_in(txn, code, student_id))
    }

    /// Register a student inside an existing transaction.
    pub fn register_student_in(
        &self,
        txn: &mut TransactionContext,
        code: &str,
        student_id: &str,
    ) -> Result<Course> {
        let code = args::require("course code", code)?;
        let student_id = args::require("student id", student_id)?;

        let key = Key::course(&code).qualified();
        let bytes = txn
            .get(&key)?
            .ok_or_else(|| Error::NotFound(format!("course {code}")))?;
        let mut course = Record::from_bytes(&bytes)?.into_course()?;

        if !course.active {
            return Err(Error::InactiveCourse(code));
        }
        if course.is_full() {
            return Err(Error::QuotaExceeded {
                code,
                enrolled: course.enrolled,
                quota: course.quota,
            });
        }

        course.enrolled += 1;
        txn.put(key, Record::Course(course.clone()).to_bytes()?)?;
        txn.emit(ContractEvent::new(
            "StudentRegistered",
            json!({
                "code": course.code,
                "student_id": student_id,
                "enrolled": course.enrolled,
            }),
        ));
        tracing::info!(
            code = %course.code,
            student = %student_id,
            enrolled = course.enrolled,
            quota = course.quota,
            "student registered"
        );
        Ok(course)
    }

    /// Open or close a course for registration.
    pub fn set_active(&self, code: &str, active: bool) -> Result<Course> {
        self.ledger
            .transaction(|txn| self.set_active_in(txn, code, active))
    }

    /// Toggle the active flag inside an existing transaction.
    pub fn set_active_in(
        &self,
        txn: &mut TransactionContext,
        code: &str,
        active: bool,
    ) -> Result<Course> {
        let code = args::require("course code", code)?;

        let key = Key::course(&code).qualified();
        let bytes = txn
            .get(&key)?
            .ok_or_else(|| Error::NotFound(format!("course {code}")))?;
        let mut course = Record::from_bytes(&bytes)?.into_course()?;

        course.active = active;
        txn.put(key, Record::Course(course.clone()).to_bytes()?)?;
        tracing::info!(code = %course.code, active, "course registration toggled");
        Ok(course)
    }

    /// Read a course from committed state. Fails with `NotFound` if absent.
    pub fn get_course(&self, code: &str) -> Result<Course> {
        let code = args::require("course code", code)?;
        let key = Key::course(&code).qualified();
        match self.ledger.get(&key) {
            Some((bytes, _)) => Record::from_bytes(&bytes)?.into_course(),
            None => Err(Error::NotFound(format!("course {code}"))),
        }
    }

    /// Whether a course exists in committed state.
    ///
    /// Never errors: blank input reads as "does not exist".
    pub fn exists(&self, code: &str) -> bool {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.ledger.get(&Key::course(trimmed).qualified()).is_some()
    }
}

/// Parse the positional quota argument.
fn parse_quota(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "course quota is required and must be a non-negative integer".into(),
        ));
    }
    trimmed.parse::<u32>().map_err(|_| {
        Error::InvalidArgument(format!(
            "course quota must be a non-negative integer, got '{trimmed}'"
        ))
    })
}
