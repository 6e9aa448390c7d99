//! Snapshot repository
//!
//! A keyed, multi-version store of entity values. Producers [`commit`] the
//! current state of an object under its key and receive an opaque
//! [`SnapshotId`]; consumers later hand that id back together with a newer
//! state and receive the patch between the two via
//! [`get_changes_and_commit`].
//!
//! ## Locking
//!
//! Each key owns its own history lock, so different keys never block each
//! other. Locks are always taken in the order key table, key history,
//! snapshot index; no lock is held while waiting on one earlier in that
//! order. The key table is never held while waiting on a key history:
//! disposal detaches histories first and locks them afterwards.
//!
//! [`commit`]: SnapshotRepository::commit
//! [`get_changes_and_commit`]: SnapshotRepository::get_changes_and_commit

mod changes;
mod history;

pub use changes::Changes;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use weft_core_types::SnapshotId;

use crate::config::RepositoryConfig;
use crate::diff::diff;
use crate::entity::EntityValue;
use crate::errors::{Result, WeftError};
use crate::patch::sink::CountingSink;
use crate::patch::{PatchCreator, PatchPath};
use crate::{log_op_end, log_op_error, log_op_start};
use history::KeyHistory;

/// Identity under which versions of one observed object are stored
pub trait RepositoryKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> RepositoryKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// Source of fresh snapshot ids
pub trait SnapshotIdGenerator: Send + Sync {
    fn next_id(&self) -> SnapshotId;
}

impl<F> SnapshotIdGenerator for F
where
    F: Fn() -> SnapshotId + Send + Sync,
{
    fn next_id(&self) -> SnapshotId {
        self()
    }
}

/// Default generator: time-ordered UUIDv7 strings
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSnapshotIds;

impl SnapshotIdGenerator for UuidSnapshotIds {
    fn next_id(&self) -> SnapshotId {
        SnapshotId::generate()
    }
}

type SharedHistory = Arc<Mutex<KeyHistory>>;

/// Thread-safe versioned entity store
pub struct SnapshotRepository<K: RepositoryKey> {
    config: RepositoryConfig,
    ids: Box<dyn SnapshotIdGenerator>,
    histories: RwLock<HashMap<K, SharedHistory>>,
    index: RwLock<HashMap<SnapshotId, K>>,
}

impl<K: RepositoryKey> Default for SnapshotRepository<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RepositoryKey> Debug for SnapshotRepository<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRepository")
            .field("config", &self.config)
            .field("keys", &self.key_count())
            .field("snapshots", &self.index.read().len())
            .finish()
    }
}

impl<K: RepositoryKey> SnapshotRepository<K> {
    /// Repository with the default configuration
    pub fn new() -> Self {
        Self {
            config: RepositoryConfig::default(),
            ids: Box::new(UuidSnapshotIds),
            histories: RwLock::new(HashMap::new()),
            index: RwLock::new(HashMap::new()),
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn with_config(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Replace the snapshot id generator
    pub fn with_id_generator(mut self, ids: impl SnapshotIdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Store `entity` as the newest version under `key`
    ///
    /// If it is structurally equal to the key's latest version, nothing is
    /// stored and the latest id is returned.
    pub fn commit(&self, key: &K, entity: EntityValue) -> SnapshotId {
        let start = Instant::now();
        log_op_start!("commit", key = ?key);

        let id = loop {
            let history = self.history_for(key);
            let mut guard = history.lock();
            // Lost a race against disposal; the key gets a fresh history.
            if !guard.is_disposed() {
                break self.commit_locked(key, &mut guard, entity);
            }
        };

        log_op_end!(
            "commit",
            duration_ms = start.elapsed().as_millis() as u64,
            snapshot_id = %id
        );
        id
    }

    /// Diff the snapshot `snapshot_id` against `entity` into `creator`
    ///
    /// On any difference `entity` is committed under the snapshot's key and
    /// the creator's output is returned along with the new id. Diffing from
    /// an older, still retained snapshot is allowed and leaves the other
    /// snapshots untouched.
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound` if the id is unknown, evicted or disposed
    /// - `MissingRecordField` if the two values disagree on a record's fields;
    ///   nothing is committed in that case
    pub fn get_changes_and_commit<C: PatchCreator>(
        &self,
        snapshot_id: &SnapshotId,
        entity: EntityValue,
        creator: C,
    ) -> Result<Changes<C::Output>> {
        let start = Instant::now();
        log_op_start!("get_changes_and_commit", snapshot_id = %snapshot_id);

        let result = self.changes_and_commit(snapshot_id, entity, creator);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok((Changes::Patched { snapshot_id: new_id, .. }, op_count)) => {
                log_op_end!(
                    "get_changes_and_commit",
                    duration_ms = duration_ms,
                    snapshot_id = %snapshot_id,
                    new_snapshot_id = %new_id,
                    op_count = *op_count,
                    unchanged = false
                );
            }
            Ok((Changes::Unchanged, _)) => {
                log_op_end!(
                    "get_changes_and_commit",
                    duration_ms = duration_ms,
                    snapshot_id = %snapshot_id,
                    op_count = 0_usize,
                    unchanged = true
                );
            }
            Err(e) => {
                log_op_error!(
                    "get_changes_and_commit",
                    e.clone(),
                    duration_ms = duration_ms,
                    snapshot_id = %snapshot_id
                );
            }
        }
        result.map(|(changes, _)| changes)
    }

    fn changes_and_commit<C: PatchCreator>(
        &self,
        snapshot_id: &SnapshotId,
        entity: EntityValue,
        mut creator: C,
    ) -> Result<(Changes<C::Output>, usize)> {
        let not_found = || WeftError::SnapshotNotFound {
            snapshot_id: snapshot_id.clone(),
        };

        let key = self
            .index
            .read()
            .get(snapshot_id)
            .cloned()
            .ok_or_else(not_found)?;
        let history = self
            .histories
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(not_found)?;

        let mut guard = history.lock();
        let base = guard.get(snapshot_id).ok_or_else(not_found)?;

        let mut counting = CountingSink::new(&mut creator);
        diff(&base, &entity, &PatchPath::root(), &mut counting)?;
        let op_count = counting.count();
        if op_count == 0 {
            return Ok((Changes::Unchanged, 0));
        }

        let new_id = self.commit_locked(&key, &mut guard, entity);
        drop(guard);

        let patch = creator.create(&new_id);
        Ok((
            Changes::Patched {
                snapshot_id: new_id,
                patch,
            },
            op_count,
        ))
    }

    /// Remove the histories of every key matching `predicate`
    ///
    /// Returns the number of snapshots dropped. A disposed key starts a
    /// fresh, unrelated history on its next commit.
    pub fn dispose_history<P>(&self, predicate: P) -> usize
    where
        P: Fn(&K) -> bool,
    {
        let start = Instant::now();
        log_op_start!("dispose_history");

        // Detach under the table lock, then release it before waiting on any
        // key lock: a long diff on one disposed key must not stall the rest.
        let detached: Vec<SharedHistory> = {
            let mut histories = self.histories.write();
            let matching: Vec<K> = histories.keys().filter(|k| predicate(*k)).cloned().collect();
            matching
                .iter()
                .filter_map(|key| histories.remove(key))
                .collect()
        };

        // Only the collected ids go; a concurrent commit that already
        // re-created one of these keys keeps its new snapshot.
        let mut dropped = Vec::new();
        for history in &detached {
            let mut guard = history.lock();
            dropped.extend(guard.dispose());
        }
        let mut index = self.index.write();
        for id in &dropped {
            index.remove(id);
        }
        drop(index);

        log_op_end!(
            "dispose_history",
            duration_ms = start.elapsed().as_millis() as u64,
            key_count = detached.len(),
            op_count = dropped.len()
        );
        dropped.len()
    }

    /// Remove the history of a single key
    pub fn dispose_key(&self, key: &K) -> usize {
        self.dispose_history(|k| k == key)
    }

    /// Latest snapshot of `key`, if it has a history
    pub fn last_commit(&self, key: &K) -> Option<(SnapshotId, Arc<EntityValue>)> {
        let history = self.histories.read().get(key).cloned()?;
        let guard = history.lock();
        guard.latest().cloned()
    }

    /// Number of retained snapshots of `key`
    pub fn snapshot_count(&self, key: &K) -> usize {
        self.histories
            .read()
            .get(key)
            .cloned()
            .map_or(0, |history| history.lock().len())
    }

    /// Whether `snapshot_id` can still be resolved
    pub fn contains(&self, snapshot_id: &SnapshotId) -> bool {
        self.index.read().contains_key(snapshot_id)
    }

    /// Number of keys with a history
    pub fn key_count(&self) -> usize {
        self.histories.read().len()
    }

    fn history_for(&self, key: &K) -> SharedHistory {
        if let Some(history) = self.histories.read().get(key) {
            return Arc::clone(history);
        }
        let mut histories = self.histories.write();
        Arc::clone(
            histories
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(KeyHistory::new()))),
        )
    }

    /// Commit with the key's history already locked by the caller
    fn commit_locked(&self, key: &K, history: &mut KeyHistory, entity: EntityValue) -> SnapshotId {
        if let Some((latest_id, latest)) = history.latest() {
            if **latest == entity {
                tracing::debug!(key = ?key, snapshot_id = %latest_id, "entity unchanged, reusing latest snapshot");
                return latest_id.clone();
            }
        }

        let id = self.ids.next_id();
        let evicted = history.push(
            id.clone(),
            Arc::new(entity),
            self.config.max_snapshots_per_key,
        );

        let mut index = self.index.write();
        for old in &evicted {
            index.remove(old);
        }
        index.insert(id.clone(), key.clone());
        drop(index);

        if !evicted.is_empty() {
            tracing::debug!(
                key = ?key,
                evicted = evicted.len(),
                history_len = history.len(),
                "retention cap reached"
            );
        }
        id
    }
}
