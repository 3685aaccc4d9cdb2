//! Document snapshot collaborator.
//!
//! The store's read path is outside this workspace. It is consumed through
//! the [`DocumentSnapshot`] trait, which only has to hand back the raw stored
//! value of one document.

use crate::values::Value;

/// A document as read from the store.
pub trait DocumentSnapshot {
    /// Document id.
    fn id(&self) -> &str;

    /// Raw stored value, or `None` if the document does not exist.
    fn data(&self) -> Option<Value>;

    /// Check whether the document exists.
    fn exists(&self) -> bool {
        self.data().is_some()
    }
}

/// Snapshot backed by a JSON document body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSnapshot {
    id: String,
    body: Option<serde_json::Value>,
}

impl JsonSnapshot {
    /// Create a snapshot of an existing document.
    pub fn new(id: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            body: Some(body),
        }
    }

    /// Create a snapshot of a missing document.
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: None,
        }
    }
}

impl DocumentSnapshot for JsonSnapshot {
    fn id(&self) -> &str {
        &self.id
    }

    fn data(&self) -> Option<Value> {
        self.body.clone().map(Value::from)
    }

    fn exists(&self) -> bool {
        self.body.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_snapshot_data() {
        let snap = JsonSnapshot::new("alice", json!({"name": "Alice", "age": 30}));
        assert_eq!(snap.id(), "alice");
        assert!(snap.exists());
        let data = snap.data().unwrap();
        assert_eq!(data.get("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_missing_snapshot() {
        let snap = JsonSnapshot::missing("ghost");
        assert!(!snap.exists());
        assert_eq!(snap.data(), None);
    }
}
