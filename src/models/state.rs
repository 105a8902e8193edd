//! Persisted session state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The per-session state document: one JSON object shared by all hooks.
pub type StateDocument = Map<String, Value>;

/// Keys the guard reads and writes.
pub mod keys {
    /// Object of hook name to `true` for every hook that ran this session.
    pub const HOOKS_ACTIVE: &str = "hooks_active";
    /// Set once a review search has happened; gates `clear_graph`.
    pub const REVIEW_DONE: &str = "graphiti_review_done";
    /// Pending confirmation for a write to the default group.
    pub const MAIN_PENDING: &str = "main_pending";
    /// Set by any `search_nodes` call.
    pub const SEARCHED: &str = "graphiti_searched";
}

/// Reads a boolean flag; anything but JSON `true` is `false`.
#[must_use]
pub fn state_flag(doc: &StateDocument, key: &str) -> bool {
    doc.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// A default-group write waiting for its confirming resubmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    /// `name` argument of the blocked write, kept as sent.
    ///
    /// A missing name is `null`. Names of different JSON types never match.
    pub name: Value,
    /// Fingerprint of the blocked write's body.
    pub content_hash: String,
}

impl PendingConfirmation {
    /// Creates a pending record.
    #[must_use]
    pub fn new(name: impl Into<Value>, content_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_hash: content_hash.into(),
        }
    }

    /// Loads the pending record from a document.
    ///
    /// The cleared slot (`{}`), a missing key and malformed values all read
    /// as `None`.
    #[must_use]
    pub fn from_document(doc: &StateDocument) -> Option<Self> {
        doc.get(keys::MAIN_PENDING)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// JSON form stored under [`keys::MAIN_PENDING`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("name".to_string(), self.name.clone());
        record.insert(
            "content_hash".to_string(),
            Value::String(self.content_hash.clone()),
        );
        Value::Object(record)
    }

    /// Value of a cleared slot.
    #[must_use]
    pub fn cleared() -> Value {
        Value::Object(Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> StateDocument {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_pending_round_trip_through_document() {
        let pending = PendingConfirmation::new("X", "abcd");
        let mut state = StateDocument::new();
        state.insert(keys::MAIN_PENDING.to_string(), pending.to_value());

        assert_eq!(PendingConfirmation::from_document(&state), Some(pending));
    }

    #[test]
    fn test_non_string_name_survives_round_trip() {
        let pending = PendingConfirmation::new(json!(42), "abcd");
        let mut state = StateDocument::new();
        state.insert(keys::MAIN_PENDING.to_string(), pending.to_value());

        let loaded = PendingConfirmation::from_document(&state).unwrap();
        assert_eq!(loaded.name, json!(42));
        assert_ne!(loaded.name, json!("42"));
    }

    #[test]
    fn test_cleared_slot_reads_as_none() {
        let state = doc(json!({"main_pending": {}}));
        assert_eq!(PendingConfirmation::from_document(&state), None);
    }

    #[test]
    fn test_malformed_slot_reads_as_none() {
        let state = doc(json!({"main_pending": {"name": 7}}));
        assert_eq!(PendingConfirmation::from_document(&state), None);
        assert_eq!(PendingConfirmation::from_document(&StateDocument::new()), None);
    }

    #[test]
    fn test_state_flag() {
        let state = doc(json!({"a": true, "b": false, "c": "true"}));
        assert!(state_flag(&state, "a"));
        assert!(!state_flag(&state, "b"));
        assert!(!state_flag(&state, "c"));
        assert!(!state_flag(&state, "missing"));
    }
}
