use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub type WorkflowId = Uuid;
pub type NodeId = String;

/// Complete workflow definition, as produced by the graph editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    #[serde(default = "Uuid::new_v4")]
    pub id: WorkflowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Connect two nodes with a plain control edge
    pub fn connect(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        let source = source.into();
        let target = target.into();
        let id = format!("e{}-{}", source, target);
        self.edges.push(Edge::new(id, source, target));
    }

    /// Connect two nodes through a named source handle (e.g. a condition
    /// node's `true`/`false` branches)
    pub fn connect_handle(
        &mut self,
        source: impl Into<NodeId>,
        handle: impl Into<String>,
        target: impl Into<NodeId>,
    ) {
        let source = source.into();
        let target = target.into();
        let handle = handle.into();
        let id = format!("e{}-{}-{}", source, handle, target);
        self.edges
            .push(Edge::new(id, source, target).with_source_handle(handle));
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A single automation step: a stable id, a type tag from the dispatcher's
/// closed set, and the type-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            data: NodeData::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.params.insert(key.into(), value.into());
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.data
            .outputs
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), kind);
        self
    }
}

/// Node payload: a human-readable label, an optional schema of named
/// result slots, and the per-type parameters (flattened so the editor's
/// plain JSON maps straight onto it)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<HashMap<String, ValueKind>>,
    #[serde(flatten)]
    pub params: HashMap<String, Value>,
}

/// Directed control/data link between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            kind: EdgeKind::Default,
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Edge classification. Only the `true`/`false` source handles affect
/// traversal; the kind itself is informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Default,
    Success,
    Failure,
    Data,
}
