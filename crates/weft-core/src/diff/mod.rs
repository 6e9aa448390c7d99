//! Structural diff engine.
//!
//! Compares two entity values and reports the differences as an ordered list
//! of patch operations through a [`PatchSink`](crate::patch::PatchSink).
//!
//! ## Entry point
//!
//! ```
//! use weft_core::diff::diff;
//! use weft_core::entity::{EntityValue, Mapping};
//! use weft_core::patch::{PatchOp, PatchPath};
//!
//! let old = EntityValue::from(Mapping::new());
//! let new = EntityValue::from(Mapping::new().with_entry("root:1", "A"));
//!
//! let mut ops: Vec<PatchOp> = Vec::new();
//! diff(&old, &new, &PatchPath::root(), &mut ops).unwrap();
//! assert_eq!(ops[0].path.to_pointer(), "/root:1");
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical operation lists.
//! - **Replayability**: applying the operations in emission order to the old
//!   value yields the new value (see [`apply_patch`](crate::patch::apply_patch)).
//! - **Purity**: the engine holds no state; it only reads its inputs and
//!   writes to the sink.

pub mod engine;

pub use engine::diff;
