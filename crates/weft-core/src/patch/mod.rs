//! Patches: the transportable description of a change between two values.
//!
//! - [`PatchSink`] is what the diff engine writes to
//! - [`PatchCreator`] is a sink that produces a transport object
//! - [`PatchBuilder`] is the default creator, producing a JSON-ready [`Patch`]
//! - [`apply_patch`] replays a patch the way a viewer does

pub mod apply;
pub mod model;
pub mod path;
pub mod sink;

pub use apply::apply_patch;
pub use model::{Patch, PatchBuilder, PatchOp, PatchOpKind};
pub use path::{PatchPath, PathSegment};
pub use sink::{PatchCreator, PatchSink};
