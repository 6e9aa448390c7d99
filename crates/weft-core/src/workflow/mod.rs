//! Workflow domain entities
//!
//! Typed model of an observed workflow (nodes, connections, ports,
//! annotations) and its conversion into entity trees. Every type converts
//! into a [`Record`] tagged with its kind; optional attributes are always
//! declared and become `Null` when absent, so two versions of one kind always
//! agree on their fields.

mod annotation;
mod node;

pub use annotation::{Annotation, AnnotationText, Bounds, ContentType};
pub use node::{
    ComponentNode, Connection, ExecutionState, Metanode, NativeNode, Node, NodeCommon, NodePort,
    NodeState, PortType, XY,
};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::entity::{EntityBuilder, EntityValue, Mapping, Record, ToEntity};

/// Repository key of a workflow: a project plus one (sub-)workflow in it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkflowKey {
    pub project_id: String,
    pub workflow_id: String,
}

impl WorkflowKey {
    pub fn new(project_id: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            workflow_id: workflow_id.into(),
        }
    }
}

impl fmt::Display for WorkflowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.project_id, self.workflow_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    Project,
    Component,
    Metanode,
}

impl ContainerType {
    fn tag(self) -> &'static str {
        match self {
            ContainerType::Project => "project",
            ContainerType::Component => "component",
            ContainerType::Metanode => "metanode",
        }
    }
}

/// Descriptive header of a workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowInfo {
    pub name: String,
    pub container_id: String,
    pub container_type: ContainerType,
    pub linked: bool,
}

impl ToEntity for WorkflowInfo {
    fn to_entity(&self) -> EntityValue {
        Record::new("workflowInfo")
            .with_field("name", self.name.as_str())
            .with_field("containerId", self.container_id.as_str())
            .with_field(
                "containerType",
                EntityValue::enum_tag(self.container_type.tag()),
            )
            .with_field("linked", self.linked)
            .into()
    }
}

/// A workflow as shown to a viewer
///
/// Nodes and connections are keyed by their ids (e.g. `root:1`);
/// annotations are positional.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    pub info: WorkflowInfo,
    pub nodes: BTreeMap<String, Node>,
    pub connections: BTreeMap<String, Connection>,
    pub annotations: Vec<Annotation>,
}

impl Workflow {
    pub fn new(info: WorkflowInfo) -> Self {
        Self {
            info,
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
            annotations: Vec::new(),
        }
    }

    /// Insert a node under its own id
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.insert(node.id().to_string(), node);
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.insert(connection.id.clone(), connection);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

fn mapping_of<T: ToEntity>(entries: &BTreeMap<String, T>) -> EntityValue {
    entries
        .iter()
        .map(|(id, item)| (id.as_str(), item.to_entity()))
        .collect::<Mapping>()
        .into()
}

impl ToEntity for Workflow {
    fn to_entity(&self) -> EntityValue {
        Record::new("workflow")
            .with_field("info", self.info.to_entity())
            .with_field("nodes", mapping_of(&self.nodes))
            .with_field("connections", mapping_of(&self.connections))
            .with_field("annotations", self.annotations.to_entity())
            .into()
    }
}

/// A workflow shared with the code that edits it
///
/// Editors mutate it through [`update`](Self::update); the repository side
/// materializes it through [`EntityBuilder`].
#[derive(Debug, Clone)]
pub struct LiveWorkflow {
    inner: Arc<RwLock<Workflow>>,
}

impl LiveWorkflow {
    pub fn new(workflow: Workflow) -> Self {
        Self {
            inner: Arc::new(RwLock::new(workflow)),
        }
    }

    pub fn update<R>(&self, edit: impl FnOnce(&mut Workflow) -> R) -> R {
        edit(&mut self.inner.write())
    }

    pub fn read<R>(&self, view: impl FnOnce(&Workflow) -> R) -> R {
        view(&self.inner.read())
    }
}

impl EntityBuilder for LiveWorkflow {
    fn build_entity(&self) -> EntityValue {
        self.inner.read().to_entity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> WorkflowInfo {
        WorkflowInfo {
            name: "wf".to_string(),
            container_id: "root".to_string(),
            container_type: ContainerType::Project,
            linked: false,
        }
    }

    #[test]
    fn test_empty_workflow_record_declares_all_fields() {
        let entity = Workflow::new(info()).to_entity();
        let record = entity.as_record().unwrap();
        assert_eq!(record.kind(), "workflow");
        let names: Vec<&str> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["info", "nodes", "connections", "annotations"]);
    }

    #[test]
    fn test_container_type_is_enum_tag() {
        let entity = info().to_entity();
        assert_eq!(
            entity.as_record().and_then(|r| r.get("containerType")),
            Some(&EntityValue::enum_tag("project"))
        );
    }

    #[test]
    fn test_live_workflow_builds_current_state() {
        let live = LiveWorkflow::new(Workflow::new(info()));
        let before = live.build_entity();
        live.update(|wf| wf.info.name = "renamed".to_string());
        assert_ne!(before, live.build_entity());
        assert_eq!(live.read(|wf| wf.info.name.clone()), "renamed");
    }

    #[test]
    fn test_key_display() {
        assert_eq!(WorkflowKey::new("p1", "root:3").to_string(), "p1#root:3");
    }
}
