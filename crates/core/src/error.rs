//! Unified error types for Tally
//!
//! One taxonomy covers the whole stack. Domain errors (`InvalidArgument`,
//! `NotFound`, `AlreadyExists`, `InactiveCourse`, `QuotaExceeded`) are
//! raised by contract logic before any staged write, so they always abort
//! with zero side effects. `Conflict` is different in kind: it means the
//! transaction was logically valid against its snapshot but the snapshot
//! went stale before commit, and only commit validation can produce it.

use crate::types::Version;
use thiserror::Error;

/// All Tally errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Missing, empty, or malformed input, caught before any read.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced key absent from committed state.
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness violation on create.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Registration attempted against a course that is closed.
    #[error("course {0} is closed to registration")]
    InactiveCourse(String),

    /// Registration attempted against a full course.
    #[error("course {code} quota is full ({enrolled}/{quota})")]
    QuotaExceeded {
        /// The course code.
        code: String,
        /// Seats taken at the observed snapshot.
        enrolled: u32,
        /// The course's seat limit.
        quota: u32,
    },

    /// Commit validation failed: a read-set key changed after the snapshot
    /// was taken. Retryable by resubmitting the whole invocation.
    #[error("commit conflict on key {key}: read {expected:?}, now {actual:?}")]
    Conflict {
        /// First key whose committed version no longer matches the read set.
        key: String,
        /// Version observed at snapshot time, `None` for observed absence.
        expected: Option<Version>,
        /// Version committed since, `None` if the key is now absent.
        actual: Option<Version>,
    },

    /// Record bytes could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Bug or invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for Tally operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether resubmitting the same invocation may succeed.
    ///
    /// Only conflicts are retryable: the business logic was sound, the
    /// snapshot was stale. Domain errors need different input, not a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
