//! Depth-first search engine

use tracing::{debug, span, Level};

use crate::core::{Algorithm, GraphModel, NodeId, StepTrace, TraceBuilder, TraceEngine};

/// Depth-first descent from the start node
///
/// Uses an explicit stack of `(node, next neighbor index)` frames, which
/// visits nodes in exactly the order of the recursive formulation while
/// keeping memory bounded by the heap rather than the call stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct DfsEngine;

impl DfsEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TraceEngine for DfsEngine {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dfs
    }

    fn trace(&self, graph: &GraphModel) -> StepTrace {
        let Some(start) = graph.start() else {
            return StepTrace::empty(Algorithm::Dfs);
        };
        let dfs_span = span!(Level::INFO, "dfs", start = start, node_count = graph.node_ids().len());
        let _enter = dfs_span.enter();

        let adjacency = graph.adjacency();
        let mut steps = TraceBuilder::new(Algorithm::Dfs).with_id_budget(graph.trace_id_budget());
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
        let mut max_depth = 1;

        steps.visit_node(start);
        steps.push(format!("Start DFS at node {}", start), vec![start], vec![]);

        while let Some(frame) = stack.last_mut() {
            let (u, next) = *frame;
            let Some(neighbor) = adjacency.neighbors(u).get(next) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let v = neighbor.node;
            if steps.visit_node(v) {
                steps.visit_edge(neighbor.edge);
                steps.push(
                    format!("DFS goes from {} to {}", u, v),
                    vec![u, v],
                    vec![neighbor.edge],
                );
                stack.push((v, 0));
                max_depth = max_depth.max(stack.len());
            }
        }

        debug!(
            discovered = steps.visited_node_count(),
            max_depth,
            steps = steps.len(),
            "DFS finished"
        );
        steps.finalize()
    }
}
