//! Bellman-Ford shortest-path engine

use tracing::{debug, span, warn, Level};

use super::helpers::{format_cost, ShortestPaths};
use crate::core::{Algorithm, EdgeId, GraphModel, NodeId, StepTrace, TraceBuilder, TraceEngine};

/// Repeated edge relaxation with negative-cycle detection
///
/// Edges are relaxed as `from → to` tuples in input order whatever the graph
/// type. Visited nodes are the nodes with a finite distance; visited edges
/// form the current shortest-path tree, so an edge leaves the set when a
/// shorter path replaces it.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellmanFordEngine;

/// Outcome of a Bellman-Ford run
#[derive(Debug, Clone)]
pub struct BellmanFordResult {
    pub paths: ShortestPaths,
    /// First edge still relaxable after the final pass, if any
    pub negative_cycle_edge: Option<EdgeId>,
    /// Number of relaxation passes performed
    pub passes: usize,
}

impl BellmanFordEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run to completion, returning the trace and the final distances
    pub fn solve(&self, graph: &GraphModel) -> (StepTrace, BellmanFordResult) {
        let mut result = BellmanFordResult {
            paths: ShortestPaths::default(),
            negative_cycle_edge: None,
            passes: 0,
        };
        let Some(start) = graph.start() else {
            return (StepTrace::empty(Algorithm::BellmanFord), result);
        };
        let bf_span = span!(
            Level::INFO,
            "bellman_ford",
            start = start,
            node_count = graph.node_ids().len(),
            edge_count = graph.edge_list().len()
        );
        let _enter = bf_span.enter();

        let node_count = graph.node_ids().len();
        let mut steps =
            TraceBuilder::new(Algorithm::BellmanFord).with_id_budget(graph.trace_id_budget());
        let mut paths = ShortestPaths::new(start);

        let push = |steps: &mut TraceBuilder,
                        paths: &ShortestPaths,
                        description: String,
                        nodes: Vec<NodeId>,
                        edges: Vec<EdgeId>| {
            if steps.is_over_budget() {
                return;
            }
            let reached = paths.partition(graph).0;
            steps.push_with_visited_nodes(description, nodes, edges, reached);
        };

        push(
            &mut steps,
            &paths,
            format!(
                "Start Bellman-Ford algorithm from node {}. Initialize distance to 0.",
                start
            ),
            vec![start],
            vec![],
        );

        let iterations = node_count.saturating_sub(1);
        for iteration in 1..=iterations {
            result.passes = iteration;
            push(
                &mut steps,
                &paths,
                format!("Iteration {}/{}: Relax all edges", iteration, iterations),
                vec![],
                vec![],
            );

            let mut updated = false;
            for edge in graph.edge_list() {
                let (u, v, weight) = (edge.from_node, edge.to_node, edge.cost());
                let Some(dist_u) = paths.distance(u) else {
                    continue;
                };
                let candidate = dist_u + weight;
                if candidate >= paths.distance_or_inf(v) {
                    continue;
                }

                if let Some(old_parent) = paths.parent_edge(v) {
                    steps.unvisit_edge(old_parent);
                }
                let previous = paths.relax(v, candidate, u, edge.id);
                steps.visit_edge(edge.id);
                updated = true;

                let description = match previous {
                    None => format!(
                        "Discover node {}: distance = {} via {} → {} (weight {})",
                        v,
                        format_cost(candidate),
                        u,
                        v,
                        format_cost(weight)
                    ),
                    Some(old) => format!(
                        "Update distance to node {}: {} → {} via {} → {}",
                        v,
                        format_cost(old),
                        format_cost(candidate),
                        u,
                        v
                    ),
                };
                push(&mut steps, &paths, description, vec![u, v], vec![edge.id]);
            }

            if steps.is_over_budget() {
                break;
            }
            if !updated {
                push(
                    &mut steps,
                    &paths,
                    format!("No updates in iteration {}. Early termination.", iteration),
                    vec![],
                    vec![],
                );
                break;
            }
        }

        push(
            &mut steps,
            &paths,
            "Check for negative cycles...".to_string(),
            vec![],
            vec![],
        );

        let relaxable = graph.edge_list().iter().find(|edge| {
            paths
                .distance(edge.from_node)
                .is_some_and(|d| d + edge.cost() < paths.distance_or_inf(edge.to_node))
        });

        match relaxable {
            Some(edge) => {
                warn!(edge_id = edge.id, "Negative cycle detected");
                result.negative_cycle_edge = Some(edge.id);
                push(
                    &mut steps,
                    &paths,
                    format!(
                        "⚠ Negative cycle detected! Edge {} → {} can still be relaxed.",
                        edge.from_node, edge.to_node
                    ),
                    vec![edge.from_node, edge.to_node],
                    vec![edge.id],
                );
                push(
                    &mut steps,
                    &paths,
                    "⚠ Algorithm terminated: Negative cycle exists. Shortest paths are undefined."
                        .to_string(),
                    vec![],
                    vec![],
                );
            }
            None => {
                let (reachable, unreachable) = paths.partition(graph);
                let mut summary = format!(
                    "Bellman-Ford complete! Shortest paths found to {}/{} nodes. No negative cycles.",
                    reachable.len(),
                    node_count
                );
                if !unreachable.is_empty() {
                    summary.push_str(&format!(" Unreachable: {:?}", unreachable));
                }
                let tree_edges = steps.visited_edges().collect();
                push(&mut steps, &paths, summary, reachable, tree_edges);
            }
        }

        debug!(
            passes = result.passes,
            negative_cycle = result.negative_cycle_edge.is_some(),
            steps = steps.len(),
            "Bellman-Ford finished"
        );
        result.paths = paths;
        (steps.finalize(), result)
    }
}

impl TraceEngine for BellmanFordEngine {
    fn algorithm(&self) -> Algorithm {
        Algorithm::BellmanFord
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
    fn test_negative_edge_without_cycle() {
        let g = graph(
            GraphType::Directed,
            &[1, 2, 3],
            &[(10, 1, 2, 4.0), (11, 1, 3, 5.0), (12, 3, 2, -3.0)],
        );
        let (trace, result) = BellmanFordEngine.solve(&g);
        assert_eq!(
            descriptions(&trace),
            vec![
                "Start Bellman-Ford algorithm from node 1. Initialize distance to 0.",
                "Iteration 1/2: Relax all edges",
                "Discover node 2: distance = 4 via 1 → 2 (weight 4)",
                "Discover node 3: distance = 5 via 1 → 3 (weight 5)",
                "Update distance to node 2: 4 → 2 via 3 → 2",
                "Iteration 2/2: Relax all edges",
                "No updates in iteration 2. Early termination.",
                "Check for negative cycles...",
                "Bellman-Ford complete! Shortest paths found to 3/3 nodes. No negative cycles.",
            ]
        );
        assert_eq!(result.paths.distance(2), Some(2.0));
        assert_eq!(result.negative_cycle_edge, None);
        assert_eq!(result.passes, 2);
    }

    #[test]
    fn test_superseded_parent_edge_leaves_visited_set() {
        let g = graph(
            GraphType::Directed,
            &[1, 2, 3],
            &[(10, 1, 2, 4.0), (11, 1, 3, 5.0), (12, 3, 2, -3.0)],
        );
        let trace = BellmanFordEngine.trace(&g);
        assert_eq!(trace.steps()[3].visited_edges, vec![10, 11]);
        assert_eq!(trace.steps()[4].visited_edges, vec![11, 12]);
        assert_eq!(trace.last().unwrap().highlight_edges, vec![11, 12]);
    }

    #[test]
    fn test_visited_nodes_follow_finite_distances() {
        let g = graph(
            GraphType::Directed,
            &[3, 1, 2],
            &[(10, 3, 2, 1.0), (11, 2, 1, 1.0)],
        );
        let trace = BellmanFordEngine.trace(&g);
        assert_eq!(trace.steps()[0].visited_nodes, vec![3]);
        assert_eq!(trace.last().unwrap().visited_nodes, vec![1, 2, 3]);
    }

    #[test]
    fn test_negative_cycle_detected() {
        let g = graph(
            GraphType::Directed,
            &[1, 2, 3],
            &[(10, 1, 2, 1.0), (11, 2, 3, -2.0), (12, 3, 2, 1.0)],
        );
        let (trace, result) = BellmanFordEngine.solve(&g);
        let descs = descriptions(&trace);
        assert_eq!(
            descs[descs.len() - 2],
            "⚠ Negative cycle detected! Edge 2 → 3 can still be relaxed."
        );
        assert_eq!(
            descs[descs.len() - 1],
            "⚠ Algorithm terminated: Negative cycle exists. Shortest paths are undefined."
        );
        assert_eq!(result.negative_cycle_edge, Some(11));
        assert!(!descs.iter().any(|d| d.contains("No negative cycles")));
    }

    #[test]
    fn test_direction_ignores_graph_type() {
        let g = graph(GraphType::Undirected, &[1, 2], &[(10, 2, 1, 1.0)]);
        let (trace, result) = BellmanFordEngine.solve(&g);
        assert!(!result.paths.is_reached(2));
        assert!(trace
            .last()
            .unwrap()
            .description
            .ends_with("Unreachable: [2]"));
    }

    #[test]
    fn test_single_node_has_no_iterations() {
        let g = graph(GraphType::Directed, &[1], &[]);
        let trace = BellmanFordEngine.trace(&g);
        assert_eq!(
            descriptions(&trace),
            vec![
                "Start Bellman-Ford algorithm from node 1. Initialize distance to 0.",
                "Check for negative cycles...",
                "Bellman-Ford complete! Shortest paths found to 1/1 nodes. No negative cycles.",
            ]
        );
    }

    #[test]
    fn test_empty_graph() {
        let g = graph(GraphType::Directed, &[], &[]);
        assert!(BellmanFordEngine.trace(&g).is_empty());
    }
}
