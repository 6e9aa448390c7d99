//! Keeps one observed object in sync with its repository history

use std::sync::Arc;

use weft_core_types::SnapshotId;

use crate::entity::EntityBuilder;
use crate::errors::Result;
use crate::patch::{Patch, PatchBuilder, PatchCreator};
use crate::repository::{Changes, RepositoryKey, SnapshotRepository};

/// Pairs a repository key with the [`EntityBuilder`] that materializes it
///
/// The host decides when to look at the live object; the tracker only
/// remembers which snapshot was handed out last.
pub struct EntityTracker<K: RepositoryKey, B: EntityBuilder> {
    repository: Arc<SnapshotRepository<K>>,
    key: K,
    builder: B,
    last: Option<SnapshotId>,
    target_type_id: Option<String>,
}

impl<K: RepositoryKey, B: EntityBuilder> EntityTracker<K, B> {
    pub fn new(repository: Arc<SnapshotRepository<K>>, key: K, builder: B) -> Self {
        Self {
            repository,
            key,
            builder,
            last: None,
            target_type_id: None,
        }
    }

    /// Tag every patch produced by [`poll`](Self::poll)
    pub fn with_target_type_id(mut self, target_type_id: impl Into<String>) -> Self {
        self.target_type_id = Some(target_type_id.into());
        self
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn last_snapshot_id(&self) -> Option<&SnapshotId> {
        self.last.as_ref()
    }

    /// Commit the current state and remember its id
    pub fn commit(&mut self) -> SnapshotId {
        let id = self.repository.commit(&self.key, self.builder.build_entity());
        self.last = Some(id.clone());
        id
    }

    /// Changes of the current state relative to `since`, using `creator`
    ///
    /// # Errors
    ///
    /// Propagates the repository's errors, e.g. `SnapshotNotFound`.
    pub fn changes_since<C: PatchCreator>(
        &mut self,
        since: &SnapshotId,
        creator: C,
    ) -> Result<Changes<C::Output>> {
        let changes =
            self.repository
                .get_changes_and_commit(since, self.builder.build_entity(), creator)?;
        if let Some(id) = changes.snapshot_id() {
            self.last = Some(id.clone());
        }
        Ok(changes)
    }

    /// Patch from the last handed-out snapshot to the current state
    ///
    /// The first call commits the initial state and returns `None`, as does
    /// any call that finds nothing changed.
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound` if the last snapshot was evicted or disposed; the
    /// tracker then starts over on the next call.
    pub fn poll(&mut self) -> Result<Option<Patch>> {
        let Some(since) = self.last.clone() else {
            self.commit();
            return Ok(None);
        };
        let mut creator = PatchBuilder::new();
        if let Some(target) = &self.target_type_id {
            creator = creator.with_target_type_id(target.clone());
        }
        match self.changes_since(&since, creator) {
            Ok(changes) => Ok(changes.into_patch()),
            Err(e) => {
                self.last = None;
                Err(e)
            }
        }
    }
}
