use crate::error::GraphError;
use crate::workflow::{Edge, Node};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Validated, read-only view of a workflow's nodes and edges.
///
/// Construction checks that node ids are unique and that every edge
/// references two existing nodes. The graph carries no execution logic;
/// the scheduler drives traversal through `start_nodes` and
/// `outgoing_edges`.
#[derive(Debug)]
pub struct Graph {
    graph: DiGraph<Node, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl Graph {
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Result<Self, GraphError> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for node in nodes {
            if index.contains_key(&node.id) {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
            let idx = graph.add_node(node.clone());
            index.insert(node.id.clone(), idx);
        }

        for edge in edges {
            let source = *index.get(&edge.source).ok_or_else(|| GraphError::DanglingEdge {
                edge: edge.id.clone(),
                node: edge.source.clone(),
            })?;
            let target = *index.get(&edge.target).ok_or_else(|| GraphError::DanglingEdge {
                edge: edge.id.clone(),
                node: edge.target.clone(),
            })?;
            graph.add_edge(source, target, edge.clone());
        }

        Ok(Self { graph, index })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    /// Nodes with no incoming edges — the run's entry points.
    /// Zero, one or many; the scheduler reports zero as a configuration
    /// error rather than crashing.
    pub fn start_nodes(&self) -> Vec<&Node> {
        self.graph
            .node_indices()
            .filter(|idx| {
                self.graph
                    .neighbors_directed(*idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| &self.graph[idx])
            .collect()
    }

    pub fn outgoing_edges(&self, id: &str) -> Vec<&Edge> {
        match self.index.get(id) {
            Some(idx) => self
                .graph
                .edges_directed(*idx, Direction::Outgoing)
                .map(|edge| edge.weight())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
