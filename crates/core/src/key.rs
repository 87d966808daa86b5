//! Kind-prefixed storage keys
//!
//! The ledger has one flat key space. To keep asset ids and course codes
//! from colliding inside it, every stored key carries its record kind as a
//! prefix: `asset:<id>` or `course:<code>`. The prefix also gives each kind
//! a contiguous range in the ordered key space, which is what prefix scans
//! iterate over.

use serde::{Deserialize, Serialize};

/// Discriminant for the two record shapes held by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A general-purpose owned record.
    Asset,
    /// A capacity-bounded registration record.
    Course,
}

impl RecordKind {
    /// The kind tag as it appears in serialized records.
    pub fn tag(&self) -> &'static str {
        match self {
            RecordKind::Asset => "asset",
            RecordKind::Course => "course",
        }
    }

    /// The key prefix owned by this kind, including the separator.
    pub fn prefix(&self) -> &'static str {
        match self {
            RecordKind::Asset => "asset:",
            RecordKind::Course => "course:",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Storage key for one record.
///
/// A `Key` pairs a [`RecordKind`] with the record's own identifier and
/// renders to the qualified form stored on the ledger.
///
/// # Example
///
/// ```
/// use tally_core::key::Key;
///
/// let key = Key::asset("asset1");
/// assert_eq!(key.qualified(), "asset:asset1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    kind: RecordKind,
    id: String,
}

impl Key {
    /// Key for an asset record.
    pub fn asset(id: impl Into<String>) -> Self {
        Key {
            kind: RecordKind::Asset,
            id: id.into(),
        }
    }

    /// Key for a course record.
    pub fn course(code: impl Into<String>) -> Self {
        Key {
            kind: RecordKind::Course,
            id: code.into(),
        }
    }

    /// The record kind this key belongs to.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// The unqualified record identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The qualified form stored on the ledger, e.g. `asset:asset1`.
    pub fn qualified(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.id)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.id)
    }
}
