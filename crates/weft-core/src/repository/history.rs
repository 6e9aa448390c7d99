//! Per-key snapshot history

use std::sync::Arc;

use indexmap::IndexMap;
use weft_core_types::SnapshotId;

use crate::entity::EntityValue;

/// Snapshots of one key, kept in least-recently-used order (front = oldest
/// access).
#[derive(Debug, Default)]
pub(crate) struct KeyHistory {
    snapshots: IndexMap<SnapshotId, Arc<EntityValue>>,
    latest: Option<(SnapshotId, Arc<EntityValue>)>,
    disposed: bool,
}

impl KeyHistory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A disposed history has been detached from its repository; callers
    /// holding a stale handle must fetch a fresh one.
    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(crate) fn latest(&self) -> Option<&(SnapshotId, Arc<EntityValue>)> {
        self.latest.as_ref()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Look up a snapshot and mark it as most recently used
    pub(crate) fn get(&mut self, id: &SnapshotId) -> Option<Arc<EntityValue>> {
        let (id, value) = self.snapshots.shift_remove_entry(id)?;
        self.snapshots.insert(id, Arc::clone(&value));
        Some(value)
    }

    /// Store a new latest snapshot and return the ids evicted to stay within
    /// `cap` entries.
    pub(crate) fn push(
        &mut self,
        id: SnapshotId,
        value: Arc<EntityValue>,
        cap: usize,
    ) -> Vec<SnapshotId> {
        self.snapshots.shift_remove(&id);
        self.snapshots.insert(id.clone(), Arc::clone(&value));
        self.latest = Some((id, value));

        // The just-pushed latest entry sits at the back and survives any
        // cap of at least one.
        let mut evicted = Vec::new();
        while self.snapshots.len() > cap.max(1) {
            match self.snapshots.shift_remove_index(0) {
                Some((id, _)) => evicted.push(id),
                None => break,
            }
        }
        evicted
    }

    /// Drop every snapshot and return their ids
    pub(crate) fn dispose(&mut self) -> Vec<SnapshotId> {
        self.disposed = true;
        self.latest = None;
        self.snapshots.drain(..).map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(n: i64) -> Arc<EntityValue> {
        Arc::new(EntityValue::from(n))
    }

    fn ids(history: &KeyHistory) -> Vec<&str> {
        history.snapshots.keys().map(SnapshotId::as_str).collect()
    }

    #[test]
    fn test_push_evicts_least_recently_used() {
        let mut history = KeyHistory::new();
        history.push("a".into(), value(1), 2);
        history.push("b".into(), value(2), 2);
        history.get(&"a".into());
        let evicted = history.push("c".into(), value(3), 2);

        assert_eq!(evicted, vec![SnapshotId::from("b")]);
        assert_eq!(ids(&history), vec!["a", "c"]);
    }

    #[test]
    fn test_latest_survives_cap_of_one() {
        let mut history = KeyHistory::new();
        history.push("a".into(), value(1), 1);
        let evicted = history.push("b".into(), value(2), 1);

        assert_eq!(evicted, vec![SnapshotId::from("a")]);
        assert_eq!(history.latest().map(|(id, _)| id.as_str()), Some("b"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_dispose_returns_all_ids() {
        let mut history = KeyHistory::new();
        history.push("a".into(), value(1), 5);
        history.push("b".into(), value(2), 5);

        let mut disposed = history.dispose();
        disposed.sort();
        assert_eq!(disposed, vec![SnapshotId::from("a"), SnapshotId::from("b")]);
        assert!(history.is_disposed());
        assert!(history.latest().is_none());
        assert!(history.get(&"a".into()).is_none());
    }
}
