//! Dijkstra shortest-path engine

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, span, Level};

use super::helpers::{format_cost, Cost, ShortestPaths};
use crate::core::{Algorithm, GraphModel, StepTrace, TraceBuilder, TraceEngine};

/// Single-source shortest paths with a binary min-heap
///
/// Equal distances pop in ascending node id order. Stale heap entries are
/// skipped on pop, so each node is settled exactly once.
#[derive(Debug, Default, Clone, Copy)]
pub struct DijkstraEngine;

impl DijkstraEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run to completion, returning the trace and the settled distances
    pub fn solve(&self, graph: &GraphModel) -> (StepTrace, ShortestPaths) {
        let Some(start) = graph.start() else {
            return (StepTrace::empty(Algorithm::Dijkstra), ShortestPaths::default());
        };
        let dijkstra_span = span!(
            Level::INFO,
            "dijkstra",
            start = start,
            node_count = graph.node_ids().len(),
            edge_count = graph.edge_list().len()
        );
        let _enter = dijkstra_span.enter();

        let adjacency = graph.adjacency();
        let mut steps =
            TraceBuilder::new(Algorithm::Dijkstra).with_id_budget(graph.trace_id_budget());
        let mut paths = ShortestPaths::new(start);
        let mut heap = BinaryHeap::from([Reverse((Cost(0.0), start))]);

        steps.push(
            format!(
                "Start Dijkstra's algorithm from node {}. Initialize distance to 0.",
                start
            ),
            vec![start],
            vec![],
        );

        while let Some(Reverse((Cost(dist), u))) = heap.pop() {
            if !steps.visit_node(u) {
                continue;
            }
            let parent_edge = paths.parent_edge(u);
            if let Some(edge) = parent_edge {
                steps.visit_edge(edge);
            }
            steps.push(
                format!("Visit node {} with shortest distance {}", u, format_cost(dist)),
                vec![u],
                parent_edge.into_iter().collect(),
            );

            for neighbor in adjacency.neighbors(u) {
                let v = neighbor.node;
                if steps.is_node_visited(v) {
                    continue;
                }
                let candidate = dist + neighbor.weight;
                if candidate >= paths.distance_or_inf(v) {
                    continue;
                }
                let previous = paths.relax(v, candidate, u, neighbor.edge);
                heap.push(Reverse((Cost(candidate), v)));

                let description = match previous {
                    None => format!(
                        "Discover node {} with distance {} via {} → {} (weight {})",
                        v,
                        format_cost(candidate),
                        u,
                        v,
                        format_cost(neighbor.weight)
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
                steps.push(description, vec![u, v], vec![neighbor.edge]);
            }
        }

        let (reachable, unreachable) = paths.partition(graph);
        let mut summary = format!(
            "Dijkstra's complete! Shortest paths found to {}/{} nodes.",
            reachable.len(),
            graph.node_ids().len()
        );
        if !unreachable.is_empty() {
            summary.push_str(&format!(" Unreachable: {:?}", unreachable));
        }
        let tree_edges = steps.visited_edges().collect();
        steps.push(summary, reachable, tree_edges);

        debug!(
            settled = steps.visited_node_count(),
            unreachable = unreachable.len(),
            steps = steps.len(),
            "Dijkstra finished"
        );
        (steps.finalize(), paths)
    }
}

impl TraceEngine for DijkstraEngine {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dijkstra
    }

    fn trace(&self, graph: &GraphModel) -> StepTrace {
        self.solve(graph).0
    }
}
