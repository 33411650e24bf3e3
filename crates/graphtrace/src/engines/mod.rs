//! Algorithm engines
//!
//! Each engine implements [`TraceEngine`] for one algorithm tag. Engines are
//! stateless unit structs; per-run state lives on the stack of `trace`.

mod astar;
mod bellman_ford;
mod bfs;
mod dfs;
mod dijkstra;
pub mod helpers;
mod kruskal;
mod orchestrator;
mod prim;

pub use astar::AStarEngine;
pub use bellman_ford::BellmanFordEngine;
pub use bfs::BfsEngine;
pub use dfs::DfsEngine;
pub use dijkstra::DijkstraEngine;
pub use kruskal::KruskalEngine;
pub use orchestrator::Orchestrator;
pub use prim::PrimEngine;

use crate::core::{Algorithm, TraceEngine};

/// Engine registered for an algorithm tag
pub fn engine_for(algorithm: Algorithm) -> &'static dyn TraceEngine {
    match algorithm {
        Algorithm::Bfs => &BfsEngine,
        Algorithm::Dfs => &DfsEngine,
        Algorithm::Dijkstra => &DijkstraEngine,
        Algorithm::AStar => &AStarEngine,
        Algorithm::BellmanFord => &BellmanFordEngine,
        Algorithm::Kruskal => &KruskalEngine,
        Algorithm::Prim => &PrimEngine,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::core::{Edge, GraphModel, GraphType, Node, NodeId};

    /// Graph from bare node ids and `(id, from, to)` edges
    pub fn unweighted(graph_type: GraphType, nodes: &[NodeId], edges: &[(i64, i64, i64)]) -> GraphModel {
        let nodes: Vec<Node> = nodes.iter().map(|id| Node::new(*id)).collect();
        let edges: Vec<Edge> = edges
            .iter()
            .map(|(id, from, to)| Edge::new(*id, *from, *to))
            .collect();
        GraphModel::from_parts(graph_type, &nodes, &edges, None, None).unwrap()
    }

    /// Graph from bare node ids and `(id, from, to, weight)` edges
    pub fn weighted(
        graph_type: GraphType,
        nodes: &[NodeId],
        edges: &[(i64, i64, i64, f64)],
    ) -> GraphModel {
        let nodes: Vec<Node> = nodes.iter().map(|id| Node::new(*id)).collect();
        let edges: Vec<Edge> = edges
            .iter()
            .map(|(id, from, to, w)| Edge::weighted(*id, *from, *to, *w))
            .collect();
        GraphModel::from_parts(graph_type, &nodes, &edges, None, None).unwrap()
    }
}
