//! Weft Core - versioned entity repository and structural diff/patch engine
//!
//! Weft keeps successive immutable versions of keyed entity trees (for
//! example a workflow with its nodes, connections and annotations) and tells
//! remote viewers what changed between the version they hold and the current
//! one, as an ordered list of patch operations.
//!
//! - [`entity`]: the value model compared and stored by everything else
//! - [`diff`]: the deterministic structural diff engine
//! - [`patch`]: patch sinks, the default JSON-ready patch, and patch replay
//! - [`repository`]: the keyed multi-version snapshot store
//! - [`tracker`]: glue between an [`EntityBuilder`](entity::EntityBuilder)
//!   and the repository
//! - [`workflow`]: the typed workflow model and its entity conversion
//!
//! # Example
//!
//! ```
//! use weft_core::{Changes, EntityValue, Mapping, PatchBuilder, SnapshotRepository};
//!
//! let repo: SnapshotRepository<String> = SnapshotRepository::new();
//! let key = "project-1".to_string();
//!
//! let s1 = repo.commit(&key, Mapping::new().with_entry("root:1", "Reader").into());
//! let current: EntityValue = Mapping::new()
//!     .with_entry("root:1", "Reader")
//!     .with_entry("root:2", "Writer")
//!     .into();
//!
//! match repo.get_changes_and_commit(&s1, current, PatchBuilder::new()).unwrap() {
//!     Changes::Patched { patch, .. } => assert_eq!(patch.len(), 1),
//!     Changes::Unchanged => unreachable!(),
//! }
//! ```

pub mod config;
pub mod diff;
pub mod entity;
pub mod errors;
pub mod logging_facility;
pub mod patch;
pub mod repository;
pub mod tracker;
pub mod workflow;

pub use weft_core_types as core_types;

// Re-export commonly used types
pub use config::RepositoryConfig;
pub use diff::diff;
pub use entity::{EntityBuilder, EntityValue, Mapping, Record, ToEntity};
pub use errors::{ExError, ExErrorKind, Result, WeftError};
pub use patch::{apply_patch, Patch, PatchBuilder, PatchCreator, PatchOp, PatchPath, PatchSink};
pub use repository::{Changes, SnapshotRepository};
pub use tracker::EntityTracker;
pub use weft_core_types::SnapshotId;
