//! Request and response records exchanged with clients

use serde::{Deserialize, Serialize};

use super::registry::RunId;
use super::types::{Algorithm, Edge, GraphType, Node, NodeId};

/// A request to trace one algorithm over one graph
///
/// The algorithm tag stays a string until dispatch so that an unknown
/// tag is reported as [`TraceError::UnsupportedAlgorithm`](super::TraceError)
/// instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub algorithm: String,
    #[serde(default)]
    pub graph_type: GraphType,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub start_node_id: Option<NodeId>,
    #[serde(default)]
    pub target_node_id: Option<NodeId>,
}

impl RunRequest {
    /// Create an empty request for the given algorithm tag
    pub fn new(algorithm: impl Into<String>, graph_type: GraphType) -> Self {
        Self {
            algorithm: algorithm.into(),
            graph_type,
            nodes: Vec::new(),
            edges: Vec::new(),
            start_node_id: None,
            target_node_id: None,
        }
    }

    /// Add bare nodes (no coordinates)
    pub fn with_node_ids(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.nodes.extend(ids.into_iter().map(Node::new));
        self
    }

    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn with_edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        self.edges.extend(edges);
        self
    }

    pub fn with_start(mut self, start: NodeId) -> Self {
        self.start_node_id = Some(start);
        self
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target_node_id = Some(target);
        self
    }
}

/// Response to a successful run creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCreated {
    pub run_id: RunId,
    pub algorithm: Algorithm,
    pub total_steps: usize,
}

/// Summary of a stored run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: RunId,
    pub algorithm: Algorithm,
    pub total_steps: usize,
    pub graph_type: GraphType,
}
