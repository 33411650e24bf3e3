//! Core type definitions for trace generation
//!
//! This module contains the fundamental types used throughout graphtrace:
//! node and edge records, the graph type flag, the algorithm tag and the
//! engine configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::TraceError;

/// Node identifier as supplied by the client
pub type NodeId = i64;

/// Edge identifier as supplied by the client
pub type EdgeId = i64;

/// Per-request flag controlling whether edges are traversed both ways
///
/// `Weighted` is an undirected graph that carries edge weights; only
/// `Directed` restricts traversal to `from_node → to_node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    #[default]
    Undirected,
    Directed,
    Weighted,
}

impl GraphType {
    /// Returns true if edges may only be followed from source to target
    pub fn is_directed(&self) -> bool {
        matches!(self, GraphType::Directed)
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphType::Undirected => write!(f, "undirected"),
            GraphType::Directed => write!(f, "directed"),
            GraphType::Weighted => write!(f, "weighted"),
        }
    }
}

impl FromStr for GraphType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "undirected" => Ok(GraphType::Undirected),
            "directed" => Ok(GraphType::Directed),
            "weighted" => Ok(GraphType::Weighted),
            _ => Err(format!("Unknown graph type: {}", s)),
        }
    }
}

/// Supported algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "bfs")]
    Bfs,
    #[serde(rename = "dfs")]
    Dfs,
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "astar")]
    AStar,
    #[serde(rename = "bellmanford")]
    BellmanFord,
    #[serde(rename = "kruskal")]
    Kruskal,
    #[serde(rename = "prim")]
    Prim,
}

impl Algorithm {
    /// Every supported algorithm, in display order
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::BellmanFord,
        Algorithm::Kruskal,
        Algorithm::Prim,
    ];

    /// Wire tag of the algorithm
    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
            Algorithm::BellmanFord => "bellmanford",
            Algorithm::Kruskal => "kruskal",
            Algorithm::Prim => "prim",
        }
    }

    /// Human-readable name used in step descriptions
    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::Dijkstra => "Dijkstra's algorithm",
            Algorithm::AStar => "A* algorithm",
            Algorithm::BellmanFord => "Bellman-Ford algorithm",
            Algorithm::Kruskal => "Kruskal's algorithm",
            Algorithm::Prim => "Prim's algorithm",
        }
    }

    /// Returns true if the algorithm reads edge weights
    pub fn is_weighted(&self) -> bool {
        !matches!(self, Algorithm::Bfs | Algorithm::Dfs)
    }

    /// Returns true if the algorithm's result is undefined for negative weights
    pub fn requires_non_negative_weights(&self) -> bool {
        matches!(self, Algorithm::Dijkstra | Algorithm::AStar)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Algorithm {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            "bellmanford" | "bellman-ford" | "bellman_ford" => Ok(Algorithm::BellmanFord),
            "kruskal" => Ok(Algorithm::Kruskal),
            "prim" => Ok(Algorithm::Prim),
            _ => Err(TraceError::unsupported_algorithm(s)),
        }
    }
}

/// A node as supplied by the client
///
/// Deserializes from a bare integer id or from `{"id", "x", "y"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRepr")]
pub struct Node {
    pub id: NodeId,
    /// Planar coordinates, read only by heuristic engines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Node {
    /// Create a node without coordinates
    pub fn new(id: NodeId) -> Self {
        Self { id, x: None, y: None }
    }

    /// Create a node positioned at `(x, y)`
    pub fn at(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            x: Some(x),
            y: Some(y),
        }
    }

    /// Coordinates with missing components defaulted to the origin
    pub fn position(&self) -> (f64, f64) {
        (self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Bare(NodeId),
    Full {
        id: NodeId,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
}

impl From<NodeRepr> for Node {
    fn from(repr: NodeRepr) -> Self {
        match repr {
            NodeRepr::Bare(id) => Node::new(id),
            NodeRepr::Full { id, x, y } => Node { id, x, y },
        }
    }
}

/// A directed edge tuple as supplied by the client
///
/// Undirected semantics are applied by the engines, never stored here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from_node: NodeId,
    pub to_node: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Edge {
    /// Create an unweighted edge
    pub fn new(id: EdgeId, from_node: NodeId, to_node: NodeId) -> Self {
        Self {
            id,
            from_node,
            to_node,
            weight: None,
        }
    }

    /// Create a weighted edge
    pub fn weighted(id: EdgeId, from_node: NodeId, to_node: NodeId, weight: f64) -> Self {
        Self {
            id,
            from_node,
            to_node,
            weight: Some(weight),
        }
    }

    /// Weight used by weighted engines; a missing weight counts as one hop
    pub fn cost(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

/// Limits applied to every request
///
/// Node and edge limits are checked before an engine runs. Every step
/// snapshots the cumulative visited sets, so trace memory grows with
/// steps × visited ids; `max_trace_ids` caps that product while the
/// engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Maximum number of nodes accepted in one request
    pub max_nodes: usize,
    /// Maximum number of edges accepted in one request
    pub max_edges: usize,
    /// Maximum number of node/edge ids stored across all steps of one trace
    pub max_trace_ids: usize,
}

impl TraceConfig {
    pub const DEFAULT_MAX_NODES: usize = 10_000;
    pub const DEFAULT_MAX_EDGES: usize = 100_000;
    /// About 200 MB of ids
    pub const DEFAULT_MAX_TRACE_IDS: usize = 25_000_000;

    /// Create a config with explicit node/edge limits and the default trace budget
    pub fn new(max_nodes: usize, max_edges: usize) -> Self {
        Self {
            max_nodes,
            max_edges,
            max_trace_ids: Self::DEFAULT_MAX_TRACE_IDS,
        }
    }

    pub fn with_max_trace_ids(mut self, max_trace_ids: usize) -> Self {
        self.max_trace_ids = max_trace_ids;
        self
    }

    /// Read limits from `GRAPHTRACE_MAX_NODES`, `GRAPHTRACE_MAX_EDGES` and
    /// `GRAPHTRACE_MAX_TRACE_IDS`
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        fn read(var: &str, default: usize) -> usize {
            std::env::var(var)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        }

        Self {
            max_nodes: read("GRAPHTRACE_MAX_NODES", Self::DEFAULT_MAX_NODES),
            max_edges: read("GRAPHTRACE_MAX_EDGES", Self::DEFAULT_MAX_EDGES),
            max_trace_ids: read("GRAPHTRACE_MAX_TRACE_IDS", Self::DEFAULT_MAX_TRACE_IDS),
        }
    }

    /// Config without any size limits
    pub fn unbounded() -> Self {
        Self::new(usize::MAX, usize::MAX).with_max_trace_ids(usize::MAX)
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_NODES, Self::DEFAULT_MAX_EDGES)
    }
}
