//! Hand-written fixtures shared by the integration tests

use std::sync::atomic::{AtomicUsize, Ordering};

use weft_core::workflow::{
    Annotation, ComponentNode, Connection, ContainerType, ExecutionState, Metanode, NativeNode,
    Node, NodeCommon, NodePort, NodeState, Workflow, WorkflowInfo, WorkflowKey, XY,
};
use weft_core::SnapshotId;

/// Snapshot ids `<prefix>-1`, `<prefix>-2`, ... so log assertions can pick
/// out the events of one test
#[allow(dead_code)]
pub fn sequential_ids(prefix: &str) -> impl Fn() -> SnapshotId + Send + Sync + 'static {
    let prefix = prefix.to_string();
    let next = AtomicUsize::new(1);
    move || SnapshotId::from_string(format!("{}-{}", prefix, next.fetch_add(1, Ordering::SeqCst)))
}

#[allow(dead_code)]
pub fn key(workflow_id: &str) -> WorkflowKey {
    WorkflowKey::new("project-1", workflow_id)
}

#[allow(dead_code)]
pub fn info(name: &str) -> WorkflowInfo {
    WorkflowInfo {
        name: name.to_string(),
        container_id: "root".to_string(),
        container_type: ContainerType::Project,
        linked: false,
    }
}

#[allow(dead_code)]
pub fn native_node(id: &str, x: i32) -> Node {
    let mut common = NodeCommon::new(id, XY::new(x, 100));
    common.in_ports.push(NodePort::table(1));
    common.out_ports.push(NodePort::table(1));
    Node::Native(NativeNode {
        common,
        template_id: "org.example.RowFilter".to_string(),
        state: NodeState {
            execution_state: ExecutionState::Configured,
            ..NodeState::default()
        },
    })
}

#[allow(dead_code)]
pub fn component_node(id: &str) -> Node {
    Node::Component(ComponentNode {
        common: NodeCommon::new(id, XY::new(300, 100)),
        name: "Preprocessing".to_string(),
        state: NodeState::default(),
        link: None,
    })
}

#[allow(dead_code)]
pub fn metanode(id: &str) -> Node {
    Node::Metanode(Metanode {
        common: NodeCommon::new(id, XY::new(500, 100)),
        name: "Group".to_string(),
        execution_state: ExecutionState::Idle,
    })
}

/// Empty workflow
#[allow(dead_code)]
pub fn empty_workflow() -> Workflow {
    Workflow::new(info("test-workflow"))
}

/// Two native nodes connected, plus a component and a metanode
#[allow(dead_code)]
pub fn sample_workflow() -> Workflow {
    empty_workflow()
        .with_node(native_node("root:1", 100))
        .with_node(native_node("root:2", 200))
        .with_node(component_node("root:3"))
        .with_node(metanode("root:4"))
        .with_connection(Connection::new("root:1", 1, "root:2", 1))
}

#[allow(dead_code)]
pub fn with_annotations(workflow: Workflow, texts: &[&str]) -> Workflow {
    texts.iter().enumerate().fold(workflow, |wf, (i, text)| {
        wf.with_annotation(Annotation::new(format!("annotation_{}", i), *text))
    })
}
