//! A* search engine

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, span, Level};

use super::helpers::{Cost, ShortestPaths};
use crate::core::{Algorithm, GraphModel, NodeId, StepTrace, TraceBuilder, TraceEngine};

/// Goal-directed shortest path from the start node to the target node
///
/// The queue is ordered by `(f, g, node)` where `f = g + h` and `h` is the
/// straight-line distance to the target. Nodes without coordinates sit at
/// the origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct AStarEngine;

impl AStarEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run to completion, returning the trace and the g-scores reached
    pub fn solve(&self, graph: &GraphModel) -> (StepTrace, ShortestPaths) {
        let (Some(start), Some(target)) = (graph.start(), graph.target()) else {
            return (StepTrace::empty(Algorithm::AStar), ShortestPaths::default());
        };
        let astar_span = span!(
            Level::INFO,
            "astar",
            start = start,
            target = target,
            node_count = graph.node_ids().len()
        );
        let _enter = astar_span.enter();

        let (tx, ty) = graph.position(target);
        let heuristic = |node: NodeId| {
            let (x, y) = graph.position(node);
            (tx - x).hypot(ty - y)
        };

        let adjacency = graph.adjacency();
        let mut steps = TraceBuilder::new(Algorithm::AStar).with_id_budget(graph.trace_id_budget());
        let mut paths = ShortestPaths::new(start);
        let mut heap = BinaryHeap::from([Reverse((Cost(heuristic(start)), Cost(0.0), start))]);

        let mut endpoints = vec![start, target];
        endpoints.dedup();
        steps.push(
            format!(
                "Start A* algorithm from node {} to node {}. h({}) = {:.1}",
                start,
                target,
                start,
                heuristic(start)
            ),
            endpoints.clone(),
            vec![],
        );

        let mut found = false;
        while let Some(Reverse((Cost(f), Cost(g), u))) = heap.pop() {
            if !steps.visit_node(u) {
                continue;
            }
            let parent_edge = paths.parent_edge(u);
            if let Some(edge) = parent_edge {
                steps.visit_edge(edge);
            }
            steps.push(
                format!("Visit node {}: g={:.1}, h={:.1}, f={:.1}", u, g, heuristic(u), f),
                vec![u],
                parent_edge.into_iter().collect(),
            );

            if u == target {
                if let Some((path_nodes, path_edges)) = paths.path_to(target) {
                    steps.push(
                        format!("✓ Path found! Total cost: {:.1}", g),
                        path_nodes,
                        path_edges,
                    );
                    found = true;
                }
                break;
            }

            for neighbor in adjacency.neighbors(u) {
                let v = neighbor.node;
                if steps.is_node_visited(v) {
                    continue;
                }
                let tentative = g + neighbor.weight;
                if tentative >= paths.distance_or_inf(v) {
                    continue;
                }
                let previous = paths.relax(v, tentative, u, neighbor.edge);
                let h = heuristic(v);
                let f = tentative + h;
                heap.push(Reverse((Cost(f), Cost(tentative), v)));

                let description = match previous {
                    None => format!(
                        "Discover node {}: g={:.1}, h={:.1}, f={:.1} via {} → {}",
                        v, tentative, h, f, u, v
                    ),
                    Some(old) => format!(
                        "Update node {}: g={:.1}→{:.1}, f={:.1} via {} → {}",
                        v, old, tentative, f, u, v
                    ),
                };
                steps.push(description, vec![u, v], vec![neighbor.edge]);
            }
        }

        if !found {
            steps.push(
                format!("✗ No path from node {} to node {}", start, target),
                endpoints,
                vec![],
            );
        }

        debug!(
            found,
            expanded = steps.visited_node_count(),
            steps = steps.len(),
            "A* finished"
        );
        (steps.finalize(), paths)
    }
}

impl TraceEngine for AStarEngine {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
    }

    fn trace(&self, graph: &GraphModel) -> StepTrace {
        self.solve(graph).0
    }
}
