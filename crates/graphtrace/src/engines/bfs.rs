//! Breadth-first search engine

use std::collections::VecDeque;
use tracing::{debug, span, Level};

use crate::core::{Algorithm, GraphModel, StepTrace, TraceBuilder, TraceEngine};

/// First-in-first-out frontier expansion from the start node
///
/// Emits a start step, one step per dequeued node and one step per newly
/// discovered neighbor. Edges to already-discovered nodes are never recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct BfsEngine;

impl BfsEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TraceEngine for BfsEngine {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Bfs
    }

    fn trace(&self, graph: &GraphModel) -> StepTrace {
        let Some(start) = graph.start() else {
            return StepTrace::empty(Algorithm::Bfs);
        };
        let bfs_span = span!(Level::INFO, "bfs", start = start, node_count = graph.node_ids().len());
        let _enter = bfs_span.enter();

        let adjacency = graph.adjacency();
        let mut steps = TraceBuilder::new(Algorithm::Bfs).with_id_budget(graph.trace_id_budget());
        let mut queue = VecDeque::from([start]);

        steps.visit_node(start);
        steps.push(format!("Start BFS at node {}", start), vec![start], vec![]);

        while let Some(u) = queue.pop_front() {
            steps.push(format!("Visit node {}", u), vec![u], vec![]);

            for neighbor in adjacency.neighbors(u) {
                let v = neighbor.node;
                if steps.visit_node(v) {
                    steps.visit_edge(neighbor.edge);
                    queue.push_back(v);
                    steps.push(
                        format!("Discovered node {} from {}", v, u),
                        vec![u, v],
                        vec![neighbor.edge],
                    );
                }
            }
        }

        debug!(
            discovered = steps.visited_node_count(),
            steps = steps.len(),
            "BFS finished"
        );
        steps.finalize()
    }
}
