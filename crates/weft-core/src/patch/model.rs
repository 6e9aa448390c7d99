//! Patch output types.
//!
//! The JSON encoding follows JSON Patch naming (`add`, `remove`, `replace`)
//! so a browser client can replay operations with an off-the-shelf library.

use serde::{Deserialize, Serialize};
use weft_core_types::SnapshotId;

use super::path::PatchPath;
use super::sink::{PatchCreator, PatchSink};
use crate::entity::EntityValue;

/// Kind of a single patch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatchOpKind {
    #[serde(rename = "add")]
    Added,
    #[serde(rename = "remove")]
    Removed,
    #[serde(rename = "replace")]
    Replaced,
}

impl PatchOpKind {
    /// Wire name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOpKind::Added => "add",
            PatchOpKind::Removed => "remove",
            PatchOpKind::Replaced => "replace",
        }
    }
}

/// One operation of a patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: PatchOpKind,
    pub path: PatchPath,
    /// Payload of `add`/`replace`; `None` for `remove`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<EntityValue>,
}

impl PatchOp {
    pub fn added(path: PatchPath, value: EntityValue) -> Self {
        Self {
            op: PatchOpKind::Added,
            path,
            value: Some(value),
        }
    }

    pub fn removed(path: PatchPath) -> Self {
        Self {
            op: PatchOpKind::Removed,
            path,
            value: None,
        }
    }

    pub fn replaced(path: PatchPath, value: EntityValue) -> Self {
        Self {
            op: PatchOpKind::Replaced,
            path,
            value: Some(value),
        }
    }
}

/// Ordered list of operations plus the identifiers a viewer needs to
/// continue the conversation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub ops: Vec<PatchOp>,
    /// Snapshot the patch leads to; the viewer sends it back on its next request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<SnapshotId>,
    /// Type of the entity the patch applies to (e.g. `workflow`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type_id: Option<String>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Default [`PatchCreator`]: collects operations into a [`Patch`]
#[derive(Debug, Clone, Default)]
pub struct PatchBuilder {
    ops: Vec<PatchOp>,
    target_type_id: Option<String>,
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every produced patch with the given target type id
    pub fn with_target_type_id(mut self, target_type_id: impl Into<String>) -> Self {
        self.target_type_id = Some(target_type_id.into());
        self
    }

    /// Operations collected so far
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// Finish without a target snapshot (e.g. a one-off diff of two documents)
    pub fn finish(self) -> Patch {
        Patch {
            ops: self.ops,
            snapshot_id: None,
            target_type_id: self.target_type_id,
        }
    }
}

impl PatchSink for PatchBuilder {
    fn added(&mut self, path: &PatchPath, value: &EntityValue) {
        self.ops.added(path, value);
    }

    fn removed(&mut self, path: &PatchPath) {
        self.ops.removed(path);
    }

    fn replaced(&mut self, path: &PatchPath, value: &EntityValue) {
        self.ops.replaced(path, value);
    }
}

impl PatchCreator for PatchBuilder {
    type Output = Patch;

    fn create(self, snapshot_id: &SnapshotId) -> Patch {
        Patch {
            snapshot_id: Some(snapshot_id.clone()),
            ..self.finish()
        }
    }
}
