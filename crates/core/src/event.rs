//! Contract events
//!
//! Contract logic emits named events while it executes. Events are
//! buffered inside the transaction context and handed to subscribers only
//! after the transaction commits; an aborted transaction leaks nothing.

use serde::{Deserialize, Serialize};

/// A named event with an arbitrary JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Event name, e.g. `CourseCreated`.
    pub name: String,
    /// Structured payload.
    pub payload: serde_json::Value,
}

impl ContractEvent {
    /// Create a new event.
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        ContractEvent {
            name: name.into(),
            payload,
        }
    }
}
