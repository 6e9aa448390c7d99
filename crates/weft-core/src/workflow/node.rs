//! Nodes, ports and connections

use crate::entity::{EntityValue, Record, ToEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XY {
    pub x: i32,
    pub y: i32,
}

impl XY {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl ToEntity for XY {
    fn to_entity(&self) -> EntityValue {
        Record::new("xy")
            .with_field("x", self.x)
            .with_field("y", self.y)
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortType {
    Table,
    FlowVariable,
    Other,
}

impl PortType {
    fn tag(self) -> &'static str {
        match self {
            PortType::Table => "table",
            PortType::FlowVariable => "flowVariable",
            PortType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePort {
    pub index: u32,
    pub name: Option<String>,
    pub port_type: PortType,
    pub optional: bool,
    /// Ids of the connections attached to this port
    pub connected_via: Vec<String>,
}

impl NodePort {
    pub fn table(index: u32) -> Self {
        Self {
            index,
            name: None,
            port_type: PortType::Table,
            optional: false,
            connected_via: Vec::new(),
        }
    }
}

impl ToEntity for NodePort {
    fn to_entity(&self) -> EntityValue {
        Record::new("nodePort")
            .with_field("index", self.index)
            .with_field("name", self.name.clone())
            .with_field("type", EntityValue::enum_tag(self.port_type.tag()))
            .with_field("optional", self.optional)
            .with_field(
                "connectedVia",
                EntityValue::sequence(self.connected_via.iter().map(String::as_str)),
            )
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionState {
    #[default]
    Idle,
    Configured,
    Executing,
    Executed,
    Halted,
}

impl ExecutionState {
    fn tag(self) -> &'static str {
        match self {
            ExecutionState::Idle => "IDLE",
            ExecutionState::Configured => "CONFIGURED",
            ExecutionState::Executing => "EXECUTING",
            ExecutionState::Executed => "EXECUTED",
            ExecutionState::Halted => "HALTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeState {
    pub execution_state: ExecutionState,
    /// Fraction in `0.0..=1.0` while executing
    pub progress: Option<f64>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl ToEntity for NodeState {
    fn to_entity(&self) -> EntityValue {
        Record::new("nodeState")
            .with_field(
                "executionState",
                EntityValue::enum_tag(self.execution_state.tag()),
            )
            .with_field("progress", self.progress)
            .with_field("warning", self.warning.clone())
            .with_field("error", self.error.clone())
            .into()
    }
}

/// Attributes shared by every node kind
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeCommon {
    pub id: String,
    pub position: XY,
    pub in_ports: Vec<NodePort>,
    pub out_ports: Vec<NodePort>,
    pub annotation: Option<String>,
}

impl NodeCommon {
    pub fn new(id: impl Into<String>, position: XY) -> Self {
        Self {
            id: id.into(),
            position,
            ..Self::default()
        }
    }

    fn record(&self, kind: &str) -> Record {
        Record::new(kind)
            .with_field("id", self.id.as_str())
            .with_field("position", self.position.to_entity())
            .with_field("inPorts", self.in_ports.to_entity())
            .with_field("outPorts", self.out_ports.to_entity())
            .with_field("annotation", self.annotation.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeNode {
    pub common: NodeCommon,
    pub template_id: String,
    pub state: NodeState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub common: NodeCommon,
    pub name: String,
    pub state: NodeState,
    /// Source URI when the component is linked
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metanode {
    pub common: NodeCommon,
    pub name: String,
    pub execution_state: ExecutionState,
}

/// A node of any kind; each kind becomes a record of its own
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Native(NativeNode),
    Component(ComponentNode),
    Metanode(Metanode),
}

impl Node {
    pub fn common(&self) -> &NodeCommon {
        match self {
            Node::Native(n) => &n.common,
            Node::Component(n) => &n.common,
            Node::Metanode(n) => &n.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut NodeCommon {
        match self {
            Node::Native(n) => &mut n.common,
            Node::Component(n) => &mut n.common,
            Node::Metanode(n) => &mut n.common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }
}

impl ToEntity for Node {
    fn to_entity(&self) -> EntityValue {
        let record = match self {
            Node::Native(n) => n
                .common
                .record("nativeNode")
                .with_field("templateId", n.template_id.as_str())
                .with_field("state", n.state.to_entity()),
            Node::Component(n) => n
                .common
                .record("componentNode")
                .with_field("name", n.name.as_str())
                .with_field("state", n.state.to_entity())
                .with_field("link", n.link.clone()),
            Node::Metanode(n) => n
                .common
                .record("metanode")
                .with_field("name", n.name.as_str())
                .with_field(
                    "executionState",
                    EntityValue::enum_tag(n.execution_state.tag()),
                ),
        };
        record.into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: String,
    pub source_node: String,
    pub source_port: u32,
    pub dest_node: String,
    pub dest_port: u32,
    pub flow_variable_connection: bool,
    pub label: Option<String>,
}

impl Connection {
    /// Connection with the conventional `<dest>_<port>` id
    pub fn new(
        source_node: impl Into<String>,
        source_port: u32,
        dest_node: impl Into<String>,
        dest_port: u32,
    ) -> Self {
        let dest_node = dest_node.into();
        Self {
            id: format!("{}_{}", dest_node, dest_port),
            source_node: source_node.into(),
            source_port,
            dest_node,
            dest_port,
            flow_variable_connection: false,
            label: None,
        }
    }
}

impl ToEntity for Connection {
    fn to_entity(&self) -> EntityValue {
        Record::new("connection")
            .with_field("id", self.id.as_str())
            .with_field("sourceNode", self.source_node.as_str())
            .with_field("sourcePort", self.source_port)
            .with_field("destNode", self.dest_node.as_str())
            .with_field("destPort", self.dest_port)
            .with_field("flowVariableConnection", self.flow_variable_connection)
            .with_field("label", self.label.clone())
            .into()
    }
}
