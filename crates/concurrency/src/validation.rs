//! Read-set validation
//!
//! At commit time every key a transaction observed is re-checked against
//! the store's current committed version. Any difference invalidates the
//! whole transaction: a changed version, a key that vanished, or a key
//! that appeared where absence was observed. Validation runs under the
//! commit lock, so the versions it sees cannot move while it checks.

use rustc_hash::FxHashMap;
use tally_core::Version;
use tally_store::VersionedStore;

/// How a read-set entry disagrees with current committed state.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictType {
    /// The key was rewritten since the snapshot was taken.
    VersionMismatch {
        /// Version observed at snapshot time.
        observed: Version,
        /// Version committed since.
        current: Version,
    },
    /// Absence was observed, but the key has been created since.
    AppearedSinceSnapshot {
        /// Version of the key that appeared.
        current: Version,
    },
    /// A value was observed, but the key has been deleted since.
    VanishedSinceSnapshot {
        /// Version observed at snapshot time.
        observed: Version,
    },
}

impl ConflictType {
    /// The version the transaction observed, `None` for observed absence.
    pub fn observed(&self) -> Option<Version> {
        match self {
            ConflictType::VersionMismatch { observed, .. } => Some(*observed),
            ConflictType::AppearedSinceSnapshot { .. } => None,
            ConflictType::VanishedSinceSnapshot { observed } => Some(*observed),
        }
    }

    /// The version committed now, `None` if the key is currently absent.
    pub fn current(&self) -> Option<Version> {
        match self {
            ConflictType::VersionMismatch { current, .. } => Some(*current),
            ConflictType::AppearedSinceSnapshot { current } => Some(*current),
            ConflictType::VanishedSinceSnapshot { .. } => None,
        }
    }
}

/// Outcome of validating one read set.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Every observed version still matches committed state.
    Clean,
    /// At least one observed key changed; the first mismatch in key order.
    Conflict {
        /// The mismatched key.
        key: String,
        /// How it mismatched.
        conflict: ConflictType,
    },
}

impl ValidationResult {
    /// Whether the read set validated cleanly.
    pub fn is_clean(&self) -> bool {
        matches!(self, ValidationResult::Clean)
    }
}

/// Compare every read-set entry against current committed versions.
///
/// Keys are checked in sorted order so the reported conflict is
/// deterministic regardless of read order or hash-map iteration.
pub fn validate_read_set(
    read_set: &FxHashMap<String, Option<Version>>,
    store: &VersionedStore,
) -> ValidationResult {
    let mut keys: Vec<&String> = read_set.keys().collect();
    keys.sort();

    for key in keys {
        let observed = read_set[key];
        let current = store.version_of(key);
        let conflict = match (observed, current) {
            (Some(observed), Some(current)) if observed != current => {
                ConflictType::VersionMismatch { observed, current }
            }
            (None, Some(current)) => ConflictType::AppearedSinceSnapshot { current },
            (Some(observed), None) => ConflictType::VanishedSinceSnapshot { observed },
            _ => continue,
        };
        return ValidationResult::Conflict {
            key: key.clone(),
            conflict,
        };
    }
    ValidationResult::Clean
}
