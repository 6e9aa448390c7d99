//! Outcome of comparing a stored snapshot with a new entity

use weft_core_types::SnapshotId;

/// Result of [`get_changes_and_commit`](super::SnapshotRepository::get_changes_and_commit)
#[derive(Debug, Clone, PartialEq)]
pub enum Changes<P> {
    /// The new entity equals the snapshot; nothing was committed
    Unchanged,
    /// The new entity was committed as `snapshot_id`; `patch` leads there
    /// from the requested snapshot
    Patched { snapshot_id: SnapshotId, patch: P },
}

impl<P> Changes<P> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Changes::Unchanged)
    }

    pub fn snapshot_id(&self) -> Option<&SnapshotId> {
        match self {
            Changes::Unchanged => None,
            Changes::Patched { snapshot_id, .. } => Some(snapshot_id),
        }
    }

    pub fn patch(&self) -> Option<&P> {
        match self {
            Changes::Unchanged => None,
            Changes::Patched { patch, .. } => Some(patch),
        }
    }

    pub fn into_patch(self) -> Option<P> {
        match self {
            Changes::Unchanged => None,
            Changes::Patched { patch, .. } => Some(patch),
        }
    }
}
