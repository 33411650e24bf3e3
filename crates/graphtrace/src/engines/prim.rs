//! Prim minimum-spanning-tree engine

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, span, Level};

use super::helpers::{format_cost, Cost, SpanningTree};
use crate::core::{Adjacency, Algorithm, EdgeId, GraphModel, NodeId, StepTrace, TraceBuilder, TraceEngine};

/// Candidate edge keyed by `(weight, from, to, edge id)`
type Candidate = Reverse<(Cost, NodeId, NodeId, EdgeId)>;

/// Tree growth from the start node over a min-heap of candidate edges
///
/// Only a `directed` graph restricts candidates to `from → to`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimEngine;

impl PrimEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run to completion, returning the trace and the tree edges
    pub fn solve(&self, graph: &GraphModel) -> (StepTrace, SpanningTree) {
        let mut tree = SpanningTree::default();
        let Some(start) = graph.start() else {
            return (StepTrace::empty(Algorithm::Prim), tree);
        };
        let prim_span = span!(
            Level::INFO,
            "prim",
            start = start,
            node_count = graph.node_ids().len(),
            edge_count = graph.edge_list().len()
        );
        let _enter = prim_span.enter();

        let node_count = graph.node_ids().len();
        let adjacency = graph.adjacency();
        let mut steps = TraceBuilder::new(Algorithm::Prim).with_id_budget(graph.trace_id_budget());
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::new();

        steps.visit_node(start);
        steps.push(
            format!("Start Prim's algorithm from node {}. Add to MST.", start),
            vec![start],
            vec![],
        );

        push_candidates(&mut heap, &adjacency, start, |_| true);
        if !heap.is_empty() {
            steps.push(
                format!("Add all edges from node {} to priority queue.", start),
                vec![start],
                vec![],
            );
        }

        while steps.visited_node_count() < node_count {
            let Some(Reverse((Cost(weight), from, to, edge))) = heap.pop() else {
                break;
            };

            if steps.is_node_visited(to) {
                steps.push(
                    format!(
                        "✗ Skip edge {}: {} ↔ {} (weight: {}) - would create cycle",
                        edge,
                        from,
                        to,
                        format_cost(weight)
                    ),
                    vec![from, to],
                    vec![edge],
                );
                continue;
            }

            steps.visit_node(to);
            steps.visit_edge(edge);
            tree.accept(edge, weight);
            steps.push(
                format!(
                    "✓ Add edge {}: {} ↔ {} (weight: {}) to MST",
                    edge,
                    from,
                    to,
                    format_cost(weight)
                ),
                vec![from, to],
                vec![edge],
            );

            push_candidates(&mut heap, &adjacency, to, |node| !steps.is_node_visited(node));
            if steps.visited_node_count() < node_count {
                steps.push(
                    format!("Add edges from node {} to priority queue.", to),
                    vec![to],
                    vec![],
                );
            }
        }

        tree.spanning = steps.visited_node_count() == node_count;
        let tree_edges: Vec<EdgeId> = steps.visited_edges().collect();
        if tree.spanning {
            steps.push(
                format!("MST complete! Total weight: {}", format_cost(tree.total_weight)),
                vec![],
                tree_edges,
            );
        } else {
            let (in_tree, unreachable): (Vec<NodeId>, Vec<NodeId>) = graph
                .node_ids()
                .iter()
                .copied()
                .partition(|id| steps.is_node_visited(*id));
            steps.push(
                format!("MST incomplete. Unreachable nodes: {:?}", unreachable),
                in_tree,
                tree_edges,
            );
        }

        debug!(
            tree_edges = tree.edges.len(),
            spanning = tree.spanning,
            steps = steps.len(),
            "Prim finished"
        );
        (steps.finalize(), tree)
    }
}

fn push_candidates(
    heap: &mut BinaryHeap<Candidate>,
    adjacency: &Adjacency,
    from: NodeId,
    keep: impl Fn(NodeId) -> bool,
) {
    for neighbor in adjacency.neighbors(from) {
        if keep(neighbor.node) {
            heap.push(Reverse((Cost(neighbor.weight), from, neighbor.node, neighbor.edge)));
        }
    }
}

impl TraceEngine for PrimEngine {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Prim
    }

    fn trace(&self, graph: &GraphModel) -> StepTrace {
        self.solve(graph).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphType;
    use crate::engines::fixtures::weighted as graph;

    fn descriptions(trace: &StepTrace) -> Vec<&str> {
        trace.iter().map(|s| s.description.as_str()).collect()
    }

    #[test]
    fn test_triangle() {
        let g = graph(
            GraphType::Undirected,
            &[1, 2, 3],
            &[(10, 1, 2, 1.0), (11, 2, 3, 2.0), (12, 1, 3, 5.0)],
        );
        let (trace, tree) = PrimEngine.solve(&g);
        assert_eq!(
            descriptions(&trace),
            vec![
                "Start Prim's algorithm from node 1. Add to MST.",
                "Add all edges from node 1 to priority queue.",
                "✓ Add edge 10: 1 ↔ 2 (weight: 1) to MST",
                "Add edges from node 2 to priority queue.",
                "✓ Add edge 11: 2 ↔ 3 (weight: 2) to MST",
                "MST complete! Total weight: 3",
            ]
        );
        assert_eq!(tree.edges, vec![10, 11]);
        assert_eq!(tree.total_weight, 3.0);
        assert_eq!(trace.last().unwrap().highlight_edges, vec![10, 11]);
    }

    #[test]
    fn test_skips_edge_into_tree() {
        // 1-2 (1), 1-3 (2), 2-3 (1): after 1-2 and 2-3 nothing is left to add,
        // but with a fourth node the stale 1-3 candidate is popped and skipped
        let g = graph(
            GraphType::Undirected,
            &[1, 2, 3, 4],
            &[
                (10, 1, 2, 1.0),
                (11, 1, 3, 2.0),
                (12, 2, 3, 1.0),
                (13, 3, 4, 5.0),
            ],
        );
        let (trace, tree) = PrimEngine.solve(&g);
        assert!(descriptions(&trace)
            .contains(&"✗ Skip edge 11: 1 ↔ 3 (weight: 2) - would create cycle"));
        assert_eq!(tree.edges, vec![10, 12, 13]);
        assert!(tree.spanning);
    }

    #[test]
    fn test_directed_reports_unreachable() {
        let g = graph(
            GraphType::Directed,
            &[1, 2, 3],
            &[(10, 1, 2, 1.0), (11, 3, 1, 1.0)],
        );
        let (trace, tree) = PrimEngine.solve(&g);
        assert!(!tree.spanning);
        let last = trace.last().unwrap();
        assert_eq!(last.description, "MST incomplete. Unreachable nodes: [3]");
        assert_eq!(last.highlight_nodes, vec![1, 2]);
        assert_eq!(last.highlight_edges, vec![10]);
    }

    #[test]
    fn test_weighted_allows_both_directions() {
        let g = graph(GraphType::Weighted, &[1, 2], &[(10, 2, 1, 3.0)]);
        let (_, tree) = PrimEngine.solve(&g);
        assert!(tree.spanning);
    }

    #[test]
    fn test_isolated_start() {
        let g = graph(GraphType::Undirected, &[1, 2], &[]);
        let trace = PrimEngine.trace(&g);
        assert_eq!(
            descriptions(&trace),
            vec![
                "Start Prim's algorithm from node 1. Add to MST.",
                "MST incomplete. Unreachable nodes: [2]",
            ]
        );
    }

    #[test]
    fn test_negative_weights_accepted() {
        let g = graph(
            GraphType::Undirected,
            &[1, 2, 3],
            &[(10, 1, 2, -1.0), (11, 2, 3, 4.0), (12, 1, 3, -2.0)],
        );
        let (_, tree) = PrimEngine.solve(&g);
        assert_eq!(tree.total_weight, -3.0);
        assert_eq!(tree.edges, vec![12, 10]);
    }

    #[test]
    fn test_single_node() {
        let g = graph(GraphType::Undirected, &[1], &[]);
        let trace = PrimEngine.trace(&g);
        assert_eq!(trace.last().unwrap().description, "MST complete! Total weight: 0");
    }

    #[test]
    fn test_empty_graph() {
        let g = graph(GraphType::Undirected, &[], &[]);
        assert!(PrimEngine.trace(&g).is_empty());
    }
}
