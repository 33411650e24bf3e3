//! Core trait for algorithm engines
//!
//! An engine consumes a validated [`GraphModel`] and eagerly produces a
//! complete, finalized [`StepTrace`]. Engines never fail on validated input;
//! every per-run structure (frontier, queue, union-find) is local to the call.

use super::graph::GraphModel;
use super::step::StepTrace;
use super::types::Algorithm;

/// Core trait for trace-generating algorithm engines
pub trait TraceEngine: Send + Sync {
    /// The algorithm this engine implements
    fn algorithm(&self) -> Algorithm;

    /// Run the algorithm to completion and return its finalized trace
    ///
    /// An empty graph yields an empty trace.
    fn trace(&self, graph: &GraphModel) -> StepTrace;
}
