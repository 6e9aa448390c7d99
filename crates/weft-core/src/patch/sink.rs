use weft_core_types::SnapshotId;

use super::model::PatchOp;
use super::path::PatchPath;
use crate::entity::EntityValue;

/// Receiver of patch operations, called by the diff engine in emission order
///
/// This is the seam for changing how patches are encoded: the diff engine
/// only ever talks to a sink.
pub trait PatchSink {
    /// A value appeared at `path` (no value was there before)
    fn added(&mut self, path: &PatchPath, value: &EntityValue);

    /// The value at `path` disappeared
    fn removed(&mut self, path: &PatchPath);

    /// The value at `path` was replaced by `value`
    fn replaced(&mut self, path: &PatchPath, value: &EntityValue);
}

/// A sink that assembles the operations it received into a patch object
pub trait PatchCreator: PatchSink {
    /// Transportable patch type
    type Output;

    /// Finish the patch for the snapshot the changes lead to
    fn create(self, snapshot_id: &SnapshotId) -> Self::Output;
}

impl PatchSink for Vec<PatchOp> {
    fn added(&mut self, path: &PatchPath, value: &EntityValue) {
        self.push(PatchOp::added(path.clone(), value.clone()));
    }

    fn removed(&mut self, path: &PatchPath) {
        self.push(PatchOp::removed(path.clone()));
    }

    fn replaced(&mut self, path: &PatchPath, value: &EntityValue) {
        self.push(PatchOp::replaced(path.clone(), value.clone()));
    }
}

impl<S: PatchSink + ?Sized> PatchSink for &mut S {
    fn added(&mut self, path: &PatchPath, value: &EntityValue) {
        (**self).added(path, value);
    }

    fn removed(&mut self, path: &PatchPath) {
        (**self).removed(path);
    }

    fn replaced(&mut self, path: &PatchPath, value: &EntityValue) {
        (**self).replaced(path, value);
    }
}

/// Forwards to an inner sink while counting operations
pub(crate) struct CountingSink<'a, S: ?Sized> {
    inner: &'a mut S,
    count: usize,
}

impl<'a, S: PatchSink + ?Sized> CountingSink<'a, S> {
    pub(crate) fn new(inner: &'a mut S) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

impl<S: PatchSink + ?Sized> PatchSink for CountingSink<'_, S> {
    fn added(&mut self, path: &PatchPath, value: &EntityValue) {
        self.count += 1;
        self.inner.added(path, value);
    }

    fn removed(&mut self, path: &PatchPath) {
        self.count += 1;
        self.inner.removed(path);
    }

    fn replaced(&mut self, path: &PatchPath, value: &EntityValue) {
        self.count += 1;
        self.inner.replaced(path, value);
    }
}
