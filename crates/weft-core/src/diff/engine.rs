//! Structural diff computation engine.
//!
//! The core entry point is [`diff`], which walks two entity values in
//! lockstep and reports every difference to a [`PatchSink`].

use crate::entity::{EntityValue, Mapping, Record};
use crate::errors::{Result, WeftError};
use crate::patch::{PatchPath, PatchSink};

/// Compare `old` with `new` and emit the operations that turn one into the other.
///
/// Operations are emitted under `base_path`, in an order a consumer can replay
/// one by one against a live copy of `old`:
///
/// - equal values emit nothing
/// - `Null` to anything emits one `added` carrying the whole new value
/// - anything to `Null` emits one `removed`
/// - records of the same kind recurse field by field in declaration order
/// - mappings emit `added` for new keys, then `removed` for dropped keys, then
///   recurse into shared keys; each group in sorted key order
/// - sequences recurse over the shared prefix, then append new elements in
///   increasing index order, or remove surplus elements always at the index
///   of the new length
/// - inside a sequence's shared prefix, an element changing to or from `Null`
///   emits `replaced` at its index rather than `added`/`removed`, since an
///   add or remove there would shift every later position
/// - every other difference emits `replaced`
///
/// # Errors
///
/// Returns `MissingRecordField` if two records of the same kind disagree on
/// their declared fields. Operations already emitted to `sink` at that point
/// must be discarded by the caller.
pub fn diff<S: PatchSink + ?Sized>(
    old: &EntityValue,
    new: &EntityValue,
    base_path: &PatchPath,
    sink: &mut S,
) -> Result<()> {
    let mut path = base_path.clone();
    diff_values(old, new, &mut path, sink)
}

fn diff_values<S: PatchSink + ?Sized>(
    old: &EntityValue,
    new: &EntityValue,
    path: &mut PatchPath,
    sink: &mut S,
) -> Result<()> {
    if old == new {
        return Ok(());
    }
    match (old, new) {
        (EntityValue::Null, _) => sink.added(path, new),
        (_, EntityValue::Null) => sink.removed(path),
        (EntityValue::Record(a), EntityValue::Record(b)) if a.kind() == b.kind() => {
            diff_records(a, b, path, sink)?
        }
        (EntityValue::Mapping(a), EntityValue::Mapping(b)) => diff_mappings(a, b, path, sink)?,
        (EntityValue::Sequence(a), EntityValue::Sequence(b)) => {
            diff_sequences(a, b, path, sink)?
        }
        _ => sink.replaced(path, new),
    }
    Ok(())
}

fn diff_records<S: PatchSink + ?Sized>(
    old: &Record,
    new: &Record,
    path: &mut PatchPath,
    sink: &mut S,
) -> Result<()> {
    check_same_fields(old, new, path)?;

    for (name, old_field) in old.fields() {
        if let Some(new_field) = new.get(name) {
            path.push_key(name);
            let result = diff_values(old_field, new_field, path, sink);
            path.pop();
            result?;
        }
    }
    Ok(())
}

/// Both sides must declare the same fields before anything is emitted for
/// the record.
fn check_same_fields(old: &Record, new: &Record, path: &PatchPath) -> Result<()> {
    let undeclared = old
        .fields()
        .map(|(name, _)| name)
        .find(|name| !new.has_field(name))
        .or_else(|| {
            new.fields()
                .map(|(name, _)| name)
                .find(|name| !old.has_field(name))
        });
    match undeclared {
        Some(field) => Err(WeftError::MissingRecordField {
            kind: old.kind().to_string(),
            field: field.to_string(),
            path: path.to_pointer(),
        }),
        None => Ok(()),
    }
}

fn diff_mappings<S: PatchSink + ?Sized>(
    old: &Mapping,
    new: &Mapping,
    path: &mut PatchPath,
    sink: &mut S,
) -> Result<()> {
    // Keys are matched by exact equality only: "root:1" and "root:11" are
    // unrelated entries.
    for (key, value) in new.iter().filter(|(k, _)| !old.contains_key(k)) {
        path.push_key(key);
        sink.added(path, value);
        path.pop();
    }
    for key in old.keys().filter(|k| !new.contains_key(k)) {
        path.push_key(key);
        sink.removed(path);
        path.pop();
    }
    for (key, old_value) in old.iter() {
        if let Some(new_value) = new.get(key) {
            path.push_key(key);
            let result = diff_values(old_value, new_value, path, sink);
            path.pop();
            result?;
        }
    }
    Ok(())
}

fn diff_sequences<S: PatchSink + ?Sized>(
    old: &[EntityValue],
    new: &[EntityValue],
    path: &mut PatchPath,
    sink: &mut S,
) -> Result<()> {
    let shared = old.len().min(new.len());
    for (i, (old_item, new_item)) in old.iter().zip(new.iter()).enumerate() {
        if old_item == new_item {
            continue;
        }
        path.push_index(i);
        // An add/remove inside the shared prefix would shift positions for
        // the consumer; null transitions are expressed as a replacement.
        let result = if old_item.is_null() || new_item.is_null() {
            sink.replaced(path, new_item);
            Ok(())
        } else {
            diff_values(old_item, new_item, path, sink)
        };
        path.pop();
        result?;
    }

    if new.len() > old.len() {
        for (i, item) in new.iter().enumerate().skip(shared) {
            path.push_index(i);
            sink.added(path, item);
            path.pop();
        }
    } else if old.len() > new.len() {
        // Each removal shifts the remaining elements down, so every removal
        // targets the same boundary index.
        path.push_index(new.len());
        for _ in shared..old.len() {
            sink.removed(path);
        }
        path.pop();
    }
    Ok(())
}
