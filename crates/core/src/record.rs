//! Ledger record shapes
//!
//! Records are stored on the ledger as JSON bytes and carry an explicit
//! `kind` tag so a value can always be told apart from records of the
//! other shape. Decoding goes through [`Record::from_bytes`], which also
//! checks the structural invariants a committed record must satisfy.

use crate::error::{Error, Result};
use crate::key::{Key, RecordKind};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A general-purpose owned record.
///
/// Invariants: `id` is immutable after creation, `owner` is non-empty,
/// and `updated_at` strictly advances on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier, immutable after creation.
    pub id: String,
    /// Current color.
    pub color: String,
    /// Current owner, never empty.
    pub owner: String,
    /// Creation time, preserved across updates.
    pub created_at: DateTime<Utc>,
    /// Last mutation time, strictly advancing.
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Create a new asset with both timestamps set to now.
    pub fn new(id: impl Into<String>, color: impl Into<String>, owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Asset {
            id: id.into(),
            color: color.into(),
            owner: owner.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Advance `updated_at` past its previous value.
    ///
    /// Call after any field mutation. Uses wall-clock time but never moves
    /// backwards or stands still, so two mutations in the same clock tick
    /// still produce strictly increasing stamps.
    pub fn touch(&mut self) {
        self.updated_at = advance_past(self.updated_at);
    }

    /// Storage key for this asset.
    pub fn key(&self) -> Key {
        Key::asset(&self.id)
    }
}

/// A capacity-bounded registration record.
///
/// Invariants: `code` is immutable and `0 <= enrolled <= quota` at every
/// committed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code, immutable after creation.
    pub code: String,
    /// Human-readable course name.
    pub name: String,
    /// Upper bound on enrollment.
    pub quota: u32,
    /// Seats taken so far.
    pub enrolled: u32,
    /// Whether the course accepts registrations.
    pub active: bool,
}

impl Course {
    /// Create a new course, open for registration with zero enrollment.
    pub fn new(code: impl Into<String>, name: impl Into<String>, quota: u32) -> Self {
        Course {
            code: code.into(),
            name: name.into(),
            quota,
            enrolled: 0,
            active: true,
        }
    }

    /// Whether every seat is taken.
    pub fn is_full(&self) -> bool {
        self.enrolled >= self.quota
    }

    /// Storage key for this course.
    pub fn key(&self) -> Key {
        Key::course(&self.code)
    }
}

/// Tagged union of the record shapes held by the ledger.
///
/// Serializes with an explicit `kind` field (`"asset"` or `"course"`)
/// alongside the variant's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    /// An asset record.
    Asset(Asset),
    /// A course record.
    Course(Course),
}

impl Record {
    /// The kind tag of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Asset(_) => RecordKind::Asset,
            Record::Course(_) => RecordKind::Course,
        }
    }

    /// Storage key for this record.
    pub fn key(&self) -> Key {
        match self {
            Record::Asset(asset) => asset.key(),
            Record::Course(course) => course.key(),
        }
    }

    /// Encode to the JSON bytes stored on the ledger.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from ledger bytes and check structural invariants.
    pub fn from_bytes(bytes: &[u8]) -> Result<Record> {
        let record: Record = serde_json::from_slice(bytes)?;
        record.validate()?;
        Ok(record)
    }

    /// Check the invariants a committed record must satisfy.
    pub fn validate(&self) -> Result<()> {
        match self {
            Record::Asset(asset) => {
                if asset.id.trim().is_empty() {
                    return Err(Error::Serialization("asset record with empty id".into()));
                }
                if asset.owner.trim().is_empty() {
                    return Err(Error::Serialization(format!(
                        "asset {} has an empty owner",
                        asset.id
                    )));
                }
                if asset.updated_at < asset.created_at {
                    return Err(Error::Serialization(format!(
                        "asset {} updated before it was created",
                        asset.id
                    )));
                }
            }
            Record::Course(course) => {
                if course.code.trim().is_empty() {
                    return Err(Error::Serialization("course record with empty code".into()));
                }
                if course.enrolled > course.quota {
                    return Err(Error::Serialization(format!(
                        "course {} enrollment {} exceeds quota {}",
                        course.code, course.enrolled, course.quota
                    )));
                }
            }
        }
        Ok(())
    }

    /// Unwrap an asset record.
    pub fn into_asset(self) -> Result<Asset> {
        match self {
            Record::Asset(asset) => Ok(asset),
            other => Err(Error::Internal(format!(
                "expected an asset record, found kind {}",
                other.kind()
            ))),
        }
    }

    /// Unwrap a course record.
    pub fn into_course(self) -> Result<Course> {
        match self {
            Record::Course(course) => Ok(course),
            other => Err(Error::Internal(format!(
                "expected a course record, found kind {}",
                other.kind()
            ))),
        }
    }
}

/// Next timestamp strictly after `prev`.
///
/// Wall-clock now when the clock has moved, otherwise `prev` plus one
/// microsecond. Keeps per-record timestamps strictly increasing even when
/// consecutive mutations land inside one clock tick.
pub fn advance_past(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::microseconds(1)
    }
}
