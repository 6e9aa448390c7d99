//! Patch replay: the consumer side of the diff contract.
//!
//! Operations are applied strictly in order against a working copy, so a
//! `remove` at a sequence position shifts every later element down before the
//! next operation runs.

use super::model::{PatchOp, PatchOpKind};
use super::path::PathSegment;
use crate::entity::EntityValue;
use crate::errors::{Result, WeftError};

/// Apply `ops` in order to a copy of `base` and return the result
///
/// # Errors
///
/// - `InvalidPatchPath` if a path does not resolve against the working value
/// - `PatchTargetMismatch` if an operation does not fit the value it targets
///   (e.g. `remove` of a missing mapping key, `add` past the end of a sequence)
pub fn apply_patch(base: &EntityValue, ops: &[PatchOp]) -> Result<EntityValue> {
    let mut doc = base.clone();
    for op in ops {
        apply_op(&mut doc, op)?;
    }
    Ok(doc)
}

fn apply_op(doc: &mut EntityValue, op: &PatchOp) -> Result<()> {
    let payload = || op.value.clone().unwrap_or(EntityValue::Null);

    let Some((last, parents)) = op.path.split_last() else {
        *doc = match op.op {
            PatchOpKind::Removed => EntityValue::Null,
            PatchOpKind::Added | PatchOpKind::Replaced => payload(),
        };
        return Ok(());
    };

    let pointer = || op.path.to_pointer();
    let mismatch = |found: &str| WeftError::PatchTargetMismatch {
        op: op.op.as_str().to_string(),
        path: op.path.to_pointer(),
        found: found.to_string(),
    };

    let parent = resolve_mut(doc, parents, &pointer)?;
    match parent {
        EntityValue::Record(record) => {
            let kind = record.kind().to_string();
            let slot = record
                .field_mut(&last.as_key())
                .ok_or_else(|| WeftError::InvalidPatchPath {
                    path: pointer(),
                    reason: format!("record of kind '{}' has no field '{}'", kind, last),
                })?;
            *slot = match op.op {
                PatchOpKind::Removed => EntityValue::Null,
                PatchOpKind::Added | PatchOpKind::Replaced => payload(),
            };
        }
        EntityValue::Mapping(mapping) => {
            let key = last.as_key();
            match op.op {
                PatchOpKind::Added => mapping.insert(key.into_owned(), payload()),
                PatchOpKind::Replaced => {
                    if !mapping.contains_key(&key) {
                        return Err(mismatch("no entry to replace"));
                    }
                    mapping.insert(key.into_owned(), payload());
                }
                PatchOpKind::Removed => {
                    mapping
                        .remove(&key)
                        .ok_or_else(|| mismatch("no entry to remove"))?;
                }
            }
        }
        EntityValue::Sequence(items) => {
            let index = last.as_index().ok_or_else(|| WeftError::InvalidPatchPath {
                path: pointer(),
                reason: format!("'{}' is not a sequence index", last),
            })?;
            match op.op {
                PatchOpKind::Added => {
                    if index > items.len() {
                        return Err(mismatch(&format!("sequence of length {}", items.len())));
                    }
                    items.insert(index, payload());
                }
                PatchOpKind::Removed => {
                    if index >= items.len() {
                        return Err(mismatch(&format!("sequence of length {}", items.len())));
                    }
                    items.remove(index);
                }
                PatchOpKind::Replaced => {
                    let len = items.len();
                    let slot = items
                        .get_mut(index)
                        .ok_or_else(|| mismatch(&format!("sequence of length {}", len)))?;
                    *slot = payload();
                }
            }
        }
        scalar => return Err(mismatch(scalar.shape())),
    }
    Ok(())
}

fn resolve_mut<'a>(
    doc: &'a mut EntityValue,
    segments: &[PathSegment],
    pointer: &dyn Fn() -> String,
) -> Result<&'a mut EntityValue> {
    let mut current = doc;
    for segment in segments {
        let shape = current.shape();
        current = match current {
            EntityValue::Record(record) => record.field_mut(&segment.as_key()),
            EntityValue::Mapping(mapping) => mapping.get_mut(&segment.as_key()),
            EntityValue::Sequence(items) => segment.as_index().and_then(|i| items.get_mut(i)),
            _ => None,
        }
        .ok_or_else(|| WeftError::InvalidPatchPath {
            path: pointer(),
            reason: format!("segment '{}' does not resolve in {}", segment, shape),
        })?;
    }
    Ok(current)
}
