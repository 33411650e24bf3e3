//! Kruskal minimum-spanning-tree engine
//!
//! Uses union-find with path compression and union by rank.

use std::collections::HashMap;
use tracing::{debug, span, Level};

use super::helpers::{format_cost, SpanningTree};
use crate::core::{Algorithm, Edge, GraphModel, NodeId, StepTrace, TraceBuilder, TraceEngine};

/// Union-Find over dense indices
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Merge the sets of `x` and `y`; false if already joined
    fn union(&mut self, x: usize, y: usize) -> bool {
        let px = self.find(x);
        let py = self.find(y);
        if px == py {
            return false;
        }

        if self.rank[px] < self.rank[py] {
            self.parent[px] = py;
        } else if self.rank[px] > self.rank[py] {
            self.parent[py] = px;
        } else {
            self.parent[py] = px;
            self.rank[px] += 1;
        }
        true
    }
}

/// Greedy MST over edges sorted by weight
///
/// Edge direction is ignored. Ties keep input order. Visited nodes are the
/// endpoints of accepted edges.
#[derive(Debug, Default, Clone, Copy)]
pub struct KruskalEngine;

impl KruskalEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run to completion, returning the trace and the accepted edges
    pub fn solve(&self, graph: &GraphModel) -> (StepTrace, SpanningTree) {
        let mut tree = SpanningTree::default();
        if graph.is_empty() {
            return (StepTrace::empty(Algorithm::Kruskal), tree);
        }
        let kruskal_span = span!(
            Level::INFO,
            "kruskal",
            node_count = graph.node_ids().len(),
            edge_count = graph.edge_list().len()
        );
        let _enter = kruskal_span.enter();

        let index: HashMap<NodeId, usize> = graph
            .node_ids()
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        let needed = index.len() - 1;

        let mut sorted: Vec<&Edge> = graph.edge_list().iter().collect();
        sorted.sort_by(|a, b| a.cost().total_cmp(&b.cost()));

        let mut uf = UnionFind::new(index.len());
        let mut steps =
            TraceBuilder::new(Algorithm::Kruskal).with_id_budget(graph.trace_id_budget());
        steps.push("Start Kruskal's algorithm. Sorted all edges by weight.", vec![], vec![]);

        for edge in sorted {
            if tree.edges.len() == needed {
                break;
            }
            let (u, v) = (edge.from_node, edge.to_node);
            steps.push(
                format!(
                    "Consider edge {}: {} ↔ {} (weight: {})",
                    edge.id,
                    u,
                    v,
                    format_cost(edge.cost())
                ),
                vec![u, v],
                vec![edge.id],
            );

            // endpoints were validated by the graph model
            let (Some(&iu), Some(&iv)) = (index.get(&u), index.get(&v)) else {
                continue;
            };
            if uf.union(iu, iv) {
                tree.accept(edge.id, edge.cost());
                steps.visit_node(u);
                steps.visit_node(v);
                steps.visit_edge(edge.id);
                steps.push(
                    format!("✓ Add edge {} to MST (connects different components)", edge.id),
                    vec![u, v],
                    vec![edge.id],
                );
            } else {
                steps.push(
                    format!("✗ Skip edge {} (would create a cycle)", edge.id),
                    vec![u, v],
                    vec![edge.id],
                );
            }
        }

        tree.spanning = tree.edges.len() == needed;
        let tree_edges: Vec<_> = steps.visited_edges().collect();
        if tree.spanning {
            steps.push(
                format!("MST complete! Total weight: {}", format_cost(tree.total_weight)),
                vec![],
                tree_edges,
            );
        } else {
            let components = index.len() - tree.edges.len();
            steps.push(
                format!(
                    "MST incomplete: graph is disconnected. Spanning forest has {} components, total weight: {}",
                    components,
                    format_cost(tree.total_weight)
                ),
                vec![],
                tree_edges,
            );
        }

        debug!(
            accepted = tree.edges.len(),
            spanning = tree.spanning,
            steps = steps.len(),
            "Kruskal finished"
        );
        (steps.finalize(), tree)
    }
}

impl TraceEngine for KruskalEngine {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Kruskal
    }

    fn trace(&self, graph: &GraphModel) -> StepTrace {
        self.solve(graph).0
    }
}
