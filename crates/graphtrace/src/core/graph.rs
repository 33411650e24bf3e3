//! Graph model adapter
//!
//! Translates request-supplied nodes, edges, graph type and start/target
//! ids into the structures engines consume: an adjacency projection and a
//! node-id to coordinate mapping. All cross-references are validated here,
//! before any engine runs.

use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use super::error::{Result, TraceError};
use super::request::RunRequest;
use super::types::{Algorithm, Edge, EdgeId, GraphType, Node, NodeId, TraceConfig};

/// One outgoing entry of an adjacency list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub node: NodeId,
    pub edge: EdgeId,
    pub weight: f64,
}

/// Adjacency projection: node id to outgoing neighbors, in edge input order
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    lists: HashMap<NodeId, Vec<Neighbor>>,
}

impl Adjacency {
    /// Outgoing neighbors of `node`; empty for isolated or unknown nodes
    pub fn neighbors(&self, node: NodeId) -> &[Neighbor] {
        self.lists.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of adjacency entries
    pub fn entry_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }
}

/// Immutable view of one request's graph
///
/// Maintains insertion order for deterministic traversal.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph_type: GraphType,
    /// Nodes indexed by ID
    nodes: HashMap<NodeId, Node>,
    /// Node IDs in insertion order
    node_order: Vec<NodeId>,
    /// Edges in insertion order
    edges: Vec<Edge>,
    edge_ids: HashSet<EdgeId>,
    start: Option<NodeId>,
    target: Option<NodeId>,
    trace_id_budget: Option<usize>,
}

impl GraphModel {
    /// Create a new empty graph of the given type
    pub fn new(graph_type: GraphType) -> Self {
        Self {
            graph_type,
            ..Default::default()
        }
    }

    /// Build and validate a graph from a run request
    pub fn from_request(request: &RunRequest) -> Result<Self> {
        Self::from_parts(
            request.graph_type,
            &request.nodes,
            &request.edges,
            request.start_node_id,
            request.target_node_id,
        )
    }

    /// Build and validate a graph from its parts
    pub fn from_parts(
        graph_type: GraphType,
        nodes: &[Node],
        edges: &[Edge],
        start: Option<NodeId>,
        target: Option<NodeId>,
    ) -> Result<Self> {
        let mut graph = Self::new(graph_type);
        for node in nodes {
            graph.add_node(*node)?;
        }
        for edge in edges {
            graph.add_edge(*edge)?;
        }
        graph.check_weight_sum()?;
        // An empty graph yields an empty trace whatever start/target say.
        if !graph.is_empty() {
            graph.set_start(start)?;
            graph.set_target(target)?;
        }
        debug!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            graph_type = %graph_type,
            "Graph model built"
        );
        Ok(graph)
    }

    /// Set an explicit start node; `None` falls back to the first node
    pub fn set_start(&mut self, start: Option<NodeId>) -> Result<()> {
        if let Some(id) = start {
            self.require_node(id, "start node")?;
        }
        self.start = start;
        Ok(())
    }

    /// Set an explicit target node; `None` falls back to the last node
    pub fn set_target(&mut self, target: Option<NodeId>) -> Result<()> {
        if let Some(id) = target {
            self.require_node(id, "target node")?;
        }
        self.target = target;
        Ok(())
    }

    /// Graph type flag of the request
    pub fn graph_type(&self) -> GraphType {
        self.graph_type
    }

    /// Returns true if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }

    /// Node IDs in insertion order
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_order
    }

    /// Edges in insertion order
    pub fn edge_list(&self) -> &[Edge] {
        &self.edges
    }

    /// Check whether a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Start node: the explicit one, else the first node
    pub fn start(&self) -> Option<NodeId> {
        self.start.or_else(|| self.node_order.first().copied())
    }

    /// Target node: the explicit one, else the last node
    pub fn target(&self) -> Option<NodeId> {
        self.target.or_else(|| self.node_order.last().copied())
    }

    /// Cap on the ids a trace of this graph may store across all steps
    pub fn trace_id_budget(&self) -> usize {
        self.trace_id_budget.unwrap_or(usize::MAX)
    }

    pub fn set_trace_id_budget(&mut self, budget: usize) {
        self.trace_id_budget = Some(budget);
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Coordinates of a node, missing coordinates default to the origin
    pub fn position(&self, id: NodeId) -> (f64, f64) {
        self.nodes
            .get(&id)
            .map(Node::position)
            .unwrap_or((0.0, 0.0))
    }

    /// Adjacency projection honouring the graph type
    ///
    /// Only a `directed` graph suppresses the reverse direction.
    pub fn adjacency(&self) -> Adjacency {
        self.adjacency_with(!self.graph_type.is_directed())
    }

    /// Adjacency projection with an explicit direction policy
    pub fn adjacency_with(&self, bidirectional: bool) -> Adjacency {
        let mut lists: HashMap<NodeId, Vec<Neighbor>> = self
            .node_order
            .iter()
            .map(|id| (*id, Vec::new()))
            .collect();

        for edge in &self.edges {
            let weight = edge.cost();
            lists.entry(edge.from_node).or_default().push(Neighbor {
                node: edge.to_node,
                edge: edge.id,
                weight,
            });
            if bidirectional && edge.from_node != edge.to_node {
                lists.entry(edge.to_node).or_default().push(Neighbor {
                    node: edge.from_node,
                    edge: edge.id,
                    weight,
                });
            }
        }

        let adjacency = Adjacency { lists };
        trace!(
            bidirectional,
            entries = adjacency.entry_count(),
            "Built adjacency projection"
        );
        adjacency
    }

    /// Reject inputs larger than the configured limits
    pub fn check_limits(&self, config: &TraceConfig) -> Result<()> {
        if self.node_count() > config.max_nodes {
            return Err(TraceError::InputTooLarge {
                what: "nodes",
                count: self.node_count(),
                limit: config.max_nodes,
            });
        }
        if self.edge_count() > config.max_edges {
            return Err(TraceError::InputTooLarge {
                what: "edges",
                count: self.edge_count(),
                limit: config.max_edges,
            });
        }
        Ok(())
    }

    /// Reject weights the given algorithm cannot handle
    pub fn check_weights_for(&self, algorithm: Algorithm) -> Result<()> {
        if !algorithm.requires_non_negative_weights() {
            return Ok(());
        }
        match self.edges.iter().find(|e| e.cost() < 0.0) {
            Some(edge) => Err(TraceError::malformed_graph(format!(
                "edge {} has negative weight {}, which {} does not support",
                edge.id,
                edge.cost(),
                algorithm.display_name()
            ))),
            None => Ok(()),
        }
    }

    /// Path costs are sums of edge weights; a total that overflows `f64`
    /// would turn reachable nodes into unreachable ones.
    fn check_weight_sum(&self) -> Result<()> {
        let total: f64 = self.edges.iter().map(|e| e.cost().abs()).sum();
        if total.is_finite() {
            Ok(())
        } else {
            Err(TraceError::malformed_graph(format!(
                "sum of absolute edge weights overflows ({} edges)",
                self.edges.len()
            )))
        }
    }

    fn require_node(&self, id: NodeId, role: &str) -> Result<()> {
        if self.has_node(id) {
            Ok(())
        } else {
            Err(TraceError::malformed_graph(format!(
                "{} {} is not in the node list",
                role, id
            )))
        }
    }

    fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(TraceError::malformed_graph(format!(
                "duplicate node id {}",
                node.id
            )));
        }
        trace!(node_id = node.id, "Adding node");
        self.node_order.push(node.id);
        self.nodes.insert(node.id, node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Edge) -> Result<()> {
        if !self.edge_ids.insert(edge.id) {
            return Err(TraceError::malformed_graph(format!(
                "duplicate edge id {}",
                edge.id
            )));
        }
        for endpoint in [edge.from_node, edge.to_node] {
            if !self.has_node(endpoint) {
                self.edge_ids.remove(&edge.id);
                return Err(TraceError::malformed_graph(format!(
                    "edge {} references unknown node {}",
                    edge.id, endpoint
                )));
            }
        }
        if let Some(weight) = edge.weight {
            if !weight.is_finite() {
                self.edge_ids.remove(&edge.id);
                return Err(TraceError::malformed_graph(format!(
                    "edge {} has non-finite weight {}",
                    edge.id, weight
                )));
            }
        }
        trace!(
            edge_id = edge.id,
            from = edge.from_node,
            to = edge.to_node,
            "Adding edge"
        );
        self.edges.push(edge);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(graph_type: GraphType) -> GraphModel {
        GraphModel::from_parts(
            graph_type,
            &[Node::new(1), Node::new(2), Node::new(3)],
            &[
                Edge::weighted(10, 1, 2, 1.0),
                Edge::weighted(11, 2, 3, 2.0),
                Edge::weighted(12, 1, 3, 5.0),
            ],
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_default_start_and_target() {
        let graph = triangle(GraphType::Undirected);
        assert_eq!(graph.start(), Some(1));
        assert_eq!(graph.target(), Some(3));
    }

    #[test]
    fn test_explicit_start_and_target() {
        let graph = GraphModel::from_parts(
            GraphType::Undirected,
            &[Node::new(1), Node::new(2)],
            &[],
            Some(2),
            Some(1),
        )
        .unwrap();
        assert_eq!(graph.start(), Some(2));
        assert_eq!(graph.target(), Some(1));
    }

    #[test]
    fn test_empty_graph_ignores_start() {
        let graph = GraphModel::from_parts(GraphType::Directed, &[], &[], Some(5), None).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.start(), None);
        assert_eq!(graph.target(), None);
    }

    #[test]
    fn test_undirected_adjacency_has_both_directions() {
        let graph = triangle(GraphType::Undirected);
        let adjacency = graph.adjacency();
        let from_two: Vec<NodeId> = adjacency.neighbors(2).iter().map(|n| n.node).collect();
        assert_eq!(from_two, vec![1, 3]);
        assert_eq!(adjacency.entry_count(), 6);
    }

    #[test]
    fn test_weighted_graph_is_bidirectional() {
        let graph = triangle(GraphType::Weighted);
        assert_eq!(graph.adjacency().entry_count(), 6);
    }

    #[test]
    fn test_directed_adjacency_follows_input_order() {
        let graph = triangle(GraphType::Directed);
        let adjacency = graph.adjacency();
        let from_one: Vec<EdgeId> = adjacency.neighbors(1).iter().map(|n| n.edge).collect();
        assert_eq!(from_one, vec![10, 12]);
        assert!(adjacency.neighbors(3).is_empty());
    }

    #[test]
    fn test_self_loop_added_once() {
        let graph = GraphModel::from_parts(
            GraphType::Undirected,
            &[Node::new(1)],
            &[Edge::new(1, 1, 1)],
            None,
            None,
        )
        .unwrap();
        assert_eq!(graph.adjacency().neighbors(1).len(), 1);
    }

    #[test]
    fn test_position_defaults_to_origin() {
        let graph = GraphModel::from_parts(
            GraphType::Undirected,
            &[Node::at(1, 3.0, 4.0), Node::new(2)],
            &[],
            None,
            None,
        )
        .unwrap();
        assert_eq!(graph.position(1), (3.0, 4.0));
        assert_eq!(graph.position(2), (0.0, 0.0));
    }

    #[test]
    fn test_rejects_duplicate_node() {
        let err = GraphModel::from_parts(
            GraphType::Undirected,
            &[Node::new(1), Node::new(1)],
            &[],
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate node id 1"));
    }

    #[test]
    fn test_rejects_duplicate_edge() {
        let err = GraphModel::from_parts(
            GraphType::Undirected,
            &[Node::new(1), Node::new(2)],
            &[Edge::new(5, 1, 2), Edge::new(5, 2, 1)],
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate edge id 5"));
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let err = GraphModel::from_parts(
            GraphType::Undirected,
            &[Node::new(1)],
            &[Edge::new(4, 1, 9)],
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::MalformedGraph { .. }));
        assert!(err.to_string().contains("unknown node 9"));
    }

    #[test]
    fn test_rejects_unknown_start_and_target() {
        let nodes = [Node::new(1)];
        let err =
            GraphModel::from_parts(GraphType::Undirected, &nodes, &[], Some(2), None).unwrap_err();
        assert!(err.to_string().contains("start node 2"));
        let err =
            GraphModel::from_parts(GraphType::Undirected, &nodes, &[], None, Some(3)).unwrap_err();
        assert!(err.to_string().contains("target node 3"));
    }

    #[test]
    fn test_rejects_non_finite_weight() {
        let err = GraphModel::from_parts(
            GraphType::Weighted,
            &[Node::new(1), Node::new(2)],
            &[Edge::weighted(1, 1, 2, f64::NAN)],
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("non-finite weight"));
    }

    #[test]
    fn test_negative_weights_depend_on_algorithm() {
        let graph = GraphModel::from_parts(
            GraphType::Directed,
            &[Node::new(1), Node::new(2)],
            &[Edge::weighted(1, 1, 2, -3.0)],
            None,
            None,
        )
        .unwrap();
        assert!(graph.check_weights_for(Algorithm::Dijkstra).is_err());
        assert!(graph.check_weights_for(Algorithm::AStar).is_err());
        assert!(graph.check_weights_for(Algorithm::BellmanFord).is_ok());
        assert!(graph.check_weights_for(Algorithm::Prim).is_ok());
    }

    #[test]
    fn test_check_limits() {
        let graph = triangle(GraphType::Undirected);
        assert!(graph.check_limits(&TraceConfig::default()).is_ok());
        let err = graph.check_limits(&TraceConfig::new(2, 10)).unwrap_err();
        assert!(matches!(err, TraceError::InputTooLarge { what: "nodes", .. }));
        let err = graph.check_limits(&TraceConfig::new(10, 2)).unwrap_err();
        assert!(matches!(err, TraceError::InputTooLarge { what: "edges", .. }));
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let graph = triangle(GraphType::Undirected);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        let ids: Vec<NodeId> = graph.nodes().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_overflowing_weight_sum() {
        let err = GraphModel::from_parts(
            GraphType::Directed,
            &[Node::new(1), Node::new(2), Node::new(3)],
            &[Edge::weighted(1, 1, 2, 1e308), Edge::weighted(2, 2, 3, 1e308)],
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::MalformedGraph { .. }));
        assert!(err.to_string().contains("overflows"));

        // negative weights count by magnitude
        let err = GraphModel::from_parts(
            GraphType::Directed,
            &[Node::new(1), Node::new(2)],
            &[Edge::weighted(1, 1, 2, -1e308), Edge::weighted(2, 2, 1, 1e308)],
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::MalformedGraph { .. }));
    }

    #[test]
    fn test_large_finite_weights_accepted() {
        let graph = GraphModel::from_parts(
            GraphType::Directed,
            &[Node::new(1), Node::new(2)],
            &[Edge::weighted(1, 1, 2, 1e300)],
            None,
            None,
        );
        assert!(graph.is_ok());
    }

    #[test]
    fn test_trace_id_budget_defaults_to_unbounded() {
        let mut graph = triangle(GraphType::Undirected);
        assert_eq!(graph.trace_id_budget(), usize::MAX);
        graph.set_trace_id_budget(64);
        assert_eq!(graph.trace_id_budget(), 64);
    }
}
