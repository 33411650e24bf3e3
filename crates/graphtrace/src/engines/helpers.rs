//! Shared helper types for the weighted engines.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::{EdgeId, GraphModel, NodeId};

/// Edge weight or path cost with a total order, usable as a heap key
///
/// Weights are validated finite at the adapter boundary; `total_cmp` keeps
/// the order total even for negative values, unlike the `to_bits` trick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost(pub f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Tentative or final distances with parent back-pointers
///
/// Both the parent edge and the parent node are recorded on every
/// relaxation, so a path is a direct walk with no edge-list scans.
#[derive(Debug, Clone, Default)]
pub struct ShortestPaths {
    source: Option<NodeId>,
    distances: HashMap<NodeId, f64>,
    parents: HashMap<NodeId, (NodeId, EdgeId)>,
}

impl ShortestPaths {
    pub fn new(source: NodeId) -> Self {
        Self {
            source: Some(source),
            distances: HashMap::from([(source, 0.0)]),
            parents: HashMap::new(),
        }
    }

    /// Distance to `node`, `None` if unreached
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        self.distances.get(&node).copied()
    }

    /// Distance to `node`, infinite if unreached
    pub fn distance_or_inf(&self, node: NodeId) -> f64 {
        self.distance(node).unwrap_or(f64::INFINITY)
    }

    pub fn is_reached(&self, node: NodeId) -> bool {
        self.distances.contains_key(&node)
    }

    /// Edge that last improved `node`'s distance
    pub fn parent_edge(&self, node: NodeId) -> Option<EdgeId> {
        self.parents.get(&node).map(|(_, edge)| *edge)
    }

    /// Record an improved distance; returns the previous distance if any
    pub fn relax(&mut self, node: NodeId, distance: f64, via: NodeId, edge: EdgeId) -> Option<f64> {
        self.parents.insert(node, (via, edge));
        self.distances.insert(node, distance)
    }

    /// Split the graph's nodes into reached and unreached, in node order
    pub fn partition(&self, graph: &GraphModel) -> (Vec<NodeId>, Vec<NodeId>) {
        graph
            .node_ids()
            .iter()
            .copied()
            .partition(|id| self.is_reached(*id))
    }

    /// Nodes and edges from the source to `target`
    ///
    /// Walks at most one parent link per node, so a parent cycle (possible
    /// only after a negative-cycle relaxation) yields `None`.
    pub fn path_to(&self, target: NodeId) -> Option<(Vec<NodeId>, Vec<EdgeId>)> {
        let source = self.source?;
        if !self.is_reached(target) {
            return None;
        }
        let mut nodes = vec![target];
        let mut edges = Vec::new();
        let mut current = target;
        while current != source {
            if nodes.len() > self.distances.len() {
                return None;
            }
            let (parent, edge) = *self.parents.get(&current)?;
            edges.push(edge);
            nodes.push(parent);
            current = parent;
        }
        nodes.reverse();
        edges.reverse();
        Some((nodes, edges))
    }
}

/// Edges accepted into a spanning tree or forest, in acceptance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanningTree {
    pub edges: Vec<EdgeId>,
    pub total_weight: f64,
    /// True when the accepted edges connect every node
    pub spanning: bool,
}

impl SpanningTree {
    pub(crate) fn accept(&mut self, edge: EdgeId, weight: f64) {
        self.edges.push(edge);
        self.total_weight += weight;
    }
}

/// Format a distance the way step descriptions show it
pub fn format_cost(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
