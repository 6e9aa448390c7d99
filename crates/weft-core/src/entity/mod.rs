//! Entity value model
//!
//! [`EntityValue`] is the unit the repository stores and the diff engine
//! compares. Values are plain owned trees: a new version of an observed object
//! is always a freshly built tree, so earlier snapshots stay valid for diffing.
//!
//! Producing those trees from a live system is the job of an
//! [`EntityBuilder`], a collaborator injected by the host.

mod json;
mod value;

pub use value::{EntityValue, Mapping, Record};

/// Materializes the current state of some observed object as an entity tree
pub trait EntityBuilder {
    fn build_entity(&self) -> EntityValue;
}

impl<F> EntityBuilder for F
where
    F: Fn() -> EntityValue,
{
    fn build_entity(&self) -> EntityValue {
        self()
    }
}

/// Conversion of a typed domain entity into its entity tree
pub trait ToEntity {
    fn to_entity(&self) -> EntityValue;
}

impl<T: ToEntity> ToEntity for Vec<T> {
    fn to_entity(&self) -> EntityValue {
        EntityValue::Sequence(self.iter().map(ToEntity::to_entity).collect())
    }
}

impl<T: ToEntity> ToEntity for Option<T> {
    fn to_entity(&self) -> EntityValue {
        self.as_ref()
            .map(ToEntity::to_entity)
            .unwrap_or(EntityValue::Null)
    }
}
