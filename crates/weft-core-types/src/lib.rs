//! Core types shared across the Weft crates
//!
//! - **Identifiers**: [`SnapshotId`], the opaque token handed out by a repository commit
//! - **Schema constants**: canonical field keys and event names for structured logging

pub mod ids;
pub mod schema;

pub use ids::SnapshotId;
