//! Graphtrace - step-by-step traces of classic graph algorithms
//!
//! A library that runs BFS, DFS, Dijkstra, A*, Bellman-Ford, Kruskal and
//! Prim over a client-supplied graph and records every meaningful event as
//! a [`Step`], so a front end can replay the run frame by frame.
//!
//! # Quick Start
//!
//! ```rust
//! use graphtrace::{trace, Edge, GraphType, RunRequest};
//!
//! let request = RunRequest::new("bfs", GraphType::Undirected)
//!     .with_node_ids([1, 2, 3])
//!     .with_edges([Edge::new(10, 1, 2), Edge::new(11, 2, 3)]);
//!
//! let steps = trace(&request).unwrap();
//! assert_eq!(steps.len(), 6);
//! assert_eq!(steps.last().unwrap().visited_nodes, vec![1, 2, 3]);
//! ```
//!
//! # Stored Runs
//!
//! For replay across calls, register runs with an [`Orchestrator`]:
//!
//! ```rust
//! use graphtrace::prelude::*;
//!
//! let orchestrator = Orchestrator::new();
//! let request = RunRequest::new("prim", GraphType::Weighted)
//!     .with_node_ids([1, 2, 3])
//!     .with_edges([
//!         Edge::weighted(10, 1, 2, 1.0),
//!         Edge::weighted(11, 2, 3, 2.0),
//!         Edge::weighted(12, 1, 3, 5.0),
//!     ]);
//!
//! let created = orchestrator.create_run(&request).unwrap();
//! let first = orchestrator.step(&created.run_id, 0).unwrap();
//! assert_eq!(first.total_steps, created.total_steps);
//! ```

pub mod core;
pub mod engines;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;
pub use engines::{
    engine_for, AStarEngine, BellmanFordEngine, BfsEngine, DfsEngine, DijkstraEngine,
    KruskalEngine, Orchestrator, PrimEngine,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Algorithm, Edge, EdgeId, GraphModel, GraphType, InMemoryRegistry, Node, NodeId, Run,
        RunCreated, RunId, RunInfo, RunRegistry, RunRequest, Step, StepTrace, TraceBuilder,
        TraceConfig, TraceEngine, TraceError,
    };
    pub use crate::engines::{engine_for, Orchestrator};
}

/// Run one request and return its trace without storing it
///
/// Uses the default input limits.
///
/// # Example
/// ```rust
/// use graphtrace::{trace, GraphType, RunRequest};
///
/// let empty = RunRequest::new("dijkstra", GraphType::Weighted);
/// assert!(trace(&empty).unwrap().is_empty());
/// ```
pub fn trace(request: &RunRequest) -> anyhow::Result<StepTrace> {
    Ok(Orchestrator::new().execute(request)?)
}

/// Run a JSON-encoded request and return the trace as JSON
///
/// # Example
/// ```rust
/// let json = r#"{"algorithm": "dfs", "nodes": [1, 2], "edges": [{"id": 7, "from_node": 1, "to_node": 2}]}"#;
/// let output = graphtrace::trace_json(json).unwrap();
/// assert!(output.contains("DFS goes from 1 to 2"));
/// ```
pub fn trace_json(input: &str) -> anyhow::Result<String> {
    let request: RunRequest = serde_json::from_str(input)?;
    let steps = trace(&request)?;
    Ok(serde_json::to_string(&steps)?)
}

/// Wire tags of every supported algorithm
pub fn supported_algorithms() -> Vec<&'static str> {
    Algorithm::ALL.iter().map(Algorithm::tag).collect()
}
