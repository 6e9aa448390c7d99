//! Opaque identifiers handed across the repository boundary

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one retained snapshot
///
/// Snapshot ids are opaque to callers: they are only ever compared for
/// equality and passed back to the repository that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Generate a fresh, time-ordered SnapshotId using UUIDv7
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (ids echoed back by a client)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SnapshotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SnapshotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_id_generation() {
        let id1 = SnapshotId::generate();
        let id2 = SnapshotId::generate();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_snapshot_id_display() {
        let id = SnapshotId::from("snap-1");
        assert_eq!(format!("{}", id), "snap-1");
    }

    #[test]
    fn test_serialization_is_a_bare_string() {
        let id = SnapshotId::from_string("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");

        let deserialized: SnapshotId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
