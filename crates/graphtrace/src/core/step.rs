//! Step trace model
//!
//! A [`Step`] is one frame of playback: what is newly highlighted and what
//! has been visited so far. Engines never build steps by hand; they compose
//! a [`TraceBuilder`], which carries the cumulative visited sets and
//! back-fills `total_steps` when the trace is finalized.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{trace, warn};

use super::types::{Algorithm, EdgeId, NodeId};

/// One discrete, inspectable moment of an algorithm run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_index: usize,
    pub total_steps: usize,
    pub algorithm: Algorithm,
    pub description: String,
    /// Nodes newly highlighted by this step
    pub highlight_nodes: Vec<NodeId>,
    /// Edges newly highlighted by this step
    pub highlight_edges: Vec<EdgeId>,
    /// Cumulative visited nodes, sorted ascending
    pub visited_nodes: Vec<NodeId>,
    /// Cumulative visited edges, sorted ascending
    pub visited_edges: Vec<EdgeId>,
}

impl Step {
    /// Progress label in the `step N of M` form (1-based)
    pub fn progress(&self) -> String {
        format!("step {} of {}", self.step_index + 1, self.total_steps)
    }
}

/// Record of a trace that outgrew its id budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetExceeded {
    /// Ids the complete trace would have stored
    pub requested: usize,
    pub limit: usize,
}

/// The finalized, immutable sequence of steps of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTrace {
    algorithm: Algorithm,
    steps: Vec<Step>,
    #[serde(skip)]
    budget_exceeded: Option<BudgetExceeded>,
}

impl StepTrace {
    /// An empty trace, produced for graphs without nodes
    pub fn empty(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            steps: Vec::new(),
            budget_exceeded: None,
        }
    }

    /// Set when the builder ran out of id budget; such a trace has no steps
    pub fn budget_exceeded(&self) -> Option<BudgetExceeded> {
        self.budget_exceeded
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`, or `None` when out of range
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// The final step, if any
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }
}

impl<'a> IntoIterator for &'a StepTrace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only step log shared by every engine
///
/// Lifecycle: created (initialized), `push` zero or more times (running),
/// `finalize` once (finalized). Finalization consumes the builder, so a
/// trace can never be extended after its totals are written.
///
/// Every step stores its highlight and visited ids. Once the running total
/// would pass the id budget, the steps recorded so far are dropped and
/// later pushes are ignored; the finalized trace then reports
/// [`StepTrace::budget_exceeded`].
#[derive(Debug)]
pub struct TraceBuilder {
    algorithm: Algorithm,
    visited_nodes: BTreeSet<NodeId>,
    visited_edges: BTreeSet<EdgeId>,
    steps: Vec<Step>,
    id_budget: usize,
    requested_ids: usize,
    over_budget: bool,
}

impl TraceBuilder {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            visited_nodes: BTreeSet::new(),
            visited_edges: BTreeSet::new(),
            steps: Vec::new(),
            id_budget: usize::MAX,
            requested_ids: 0,
            over_budget: false,
        }
    }

    /// Cap the total number of ids stored across all steps
    pub fn with_id_budget(mut self, id_budget: usize) -> Self {
        self.id_budget = id_budget;
        self
    }

    /// True once a push has exceeded the id budget
    pub fn is_over_budget(&self) -> bool {
        self.over_budget
    }

    /// Mark a node visited; returns false if it already was
    pub fn visit_node(&mut self, node: NodeId) -> bool {
        self.visited_nodes.insert(node)
    }

    /// Mark an edge visited; returns false if it already was
    pub fn visit_edge(&mut self, edge: EdgeId) -> bool {
        self.visited_edges.insert(edge)
    }

    /// Drop an edge from the visited set
    ///
    /// Only Bellman-Ford uses this, when a shorter path supersedes a parent edge.
    pub fn unvisit_edge(&mut self, edge: EdgeId) -> bool {
        self.visited_edges.remove(&edge)
    }

    pub fn is_node_visited(&self, node: NodeId) -> bool {
        self.visited_nodes.contains(&node)
    }

    pub fn visited_node_count(&self) -> usize {
        self.visited_nodes.len()
    }

    pub fn visited_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.visited_edges.iter().copied()
    }

    /// Number of steps pushed so far
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a step carrying the current cumulative visited sets
    pub fn push(
        &mut self,
        description: impl Into<String>,
        highlight_nodes: Vec<NodeId>,
        highlight_edges: Vec<EdgeId>,
    ) {
        let size = highlight_nodes.len()
            + highlight_edges.len()
            + self.visited_nodes.len()
            + self.visited_edges.len();
        if !self.admit(size) {
            return;
        }
        let visited_nodes = self.visited_nodes.iter().copied().collect();
        self.record(description.into(), highlight_nodes, highlight_edges, visited_nodes);
    }

    /// Append a step with an explicit visited-node snapshot
    ///
    /// For engines whose visited nodes are derived state (e.g. nodes with a
    /// finite distance) rather than an insertion log. The snapshot is sorted
    /// like every other visited set.
    pub fn push_with_visited_nodes(
        &mut self,
        description: impl Into<String>,
        highlight_nodes: Vec<NodeId>,
        highlight_edges: Vec<EdgeId>,
        mut visited_nodes: Vec<NodeId>,
    ) {
        let size = highlight_nodes.len()
            + highlight_edges.len()
            + visited_nodes.len()
            + self.visited_edges.len();
        if !self.admit(size) {
            return;
        }
        visited_nodes.sort_unstable();
        self.record(description.into(), highlight_nodes, highlight_edges, visited_nodes);
    }

    fn admit(&mut self, size: usize) -> bool {
        self.requested_ids = self.requested_ids.saturating_add(size);
        if self.over_budget {
            return false;
        }
        if self.requested_ids > self.id_budget {
            warn!(
                algorithm = %self.algorithm,
                steps = self.steps.len(),
                limit = self.id_budget,
                "Trace id budget exceeded, discarding steps"
            );
            self.over_budget = true;
            self.steps = Vec::new();
            return false;
        }
        true
    }

    fn record(
        &mut self,
        description: String,
        highlight_nodes: Vec<NodeId>,
        highlight_edges: Vec<EdgeId>,
        visited_nodes: Vec<NodeId>,
    ) {
        let step = Step {
            step_index: self.steps.len(),
            total_steps: 0,
            algorithm: self.algorithm,
            description,
            highlight_nodes,
            highlight_edges,
            visited_nodes,
            visited_edges: self.visited_edges.iter().copied().collect(),
        };
        trace!(
            algorithm = %self.algorithm,
            step_index = step.step_index,
            description = %step.description,
            "Step emitted"
        );
        self.steps.push(step);
    }

    /// Rewrite every step with its index and the final trace length
    pub fn finalize(mut self) -> StepTrace {
        let total = self.steps.len();
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.step_index = index;
            step.total_steps = total;
        }
        let budget_exceeded = self.over_budget.then_some(BudgetExceeded {
            requested: self.requested_ids,
            limit: self.id_budget,
        });
        StepTrace {
            algorithm: self.algorithm,
            steps: self.steps,
            budget_exceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_back_fills_totals() {
        let mut builder = TraceBuilder::new(Algorithm::Bfs);
        builder.push("one", vec![1], vec![]);
        builder.push("two", vec![2], vec![7]);
        builder.push("three", vec![], vec![]);
        let trace = builder.finalize();

        assert_eq!(trace.len(), 3);
        for (i, step) in trace.iter().enumerate() {
            assert_eq!(step.step_index, i);
            assert_eq!(step.total_steps, 3);
            assert_eq!(step.algorithm, Algorithm::Bfs);
        }
    }

    #[test]
    fn test_visited_sets_are_snapshots() {
        let mut builder = TraceBuilder::new(Algorithm::Dfs);
        builder.visit_node(3);
        builder.push("first", vec![3], vec![]);
        builder.visit_node(1);
        builder.visit_edge(9);
        builder.push("second", vec![1], vec![9]);
        let trace = builder.finalize();

        assert_eq!(trace.steps()[0].visited_nodes, vec![3]);
        assert!(trace.steps()[0].visited_edges.is_empty());
        assert_eq!(trace.steps()[1].visited_nodes, vec![1, 3]);
        assert_eq!(trace.steps()[1].visited_edges, vec![9]);
    }

    #[test]
    fn test_unvisit_edge() {
        let mut builder = TraceBuilder::new(Algorithm::BellmanFord);
        assert!(builder.visit_edge(4));
        assert!(!builder.visit_edge(4));
        assert!(builder.unvisit_edge(4));
        assert_eq!(builder.visited_edges().count(), 0);
    }

    #[test]
    fn test_empty_trace() {
        let trace = TraceBuilder::new(Algorithm::Prim).finalize();
        assert!(trace.is_empty());
        assert_eq!(trace.algorithm(), Algorithm::Prim);
        assert_eq!(trace, StepTrace::empty(Algorithm::Prim));
        assert!(trace.get(0).is_none());
    }

    #[test]
    fn test_explicit_snapshot_is_sorted() {
        let mut builder = TraceBuilder::new(Algorithm::BellmanFord);
        builder.push_with_visited_nodes("reached", vec![], vec![], vec![3, 1, 2]);
        let trace = builder.finalize();
        assert_eq!(trace.steps()[0].visited_nodes, vec![1, 2, 3]);
    }

    #[test]
    fn test_within_id_budget() {
        // 1 highlight + 1 visited node per step
        let mut builder = TraceBuilder::new(Algorithm::Bfs).with_id_budget(4);
        builder.visit_node(1);
        builder.push("a", vec![1], vec![]);
        builder.push("b", vec![1], vec![]);
        assert!(!builder.is_over_budget());
        let trace = builder.finalize();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.budget_exceeded(), None);
    }

    #[test]
    fn test_id_budget_exceeded_discards_steps() {
        let mut builder = TraceBuilder::new(Algorithm::Bfs).with_id_budget(4);
        builder.visit_node(1);
        builder.push("a", vec![1], vec![]);
        builder.push("b", vec![1], vec![]);
        builder.push("c", vec![1], vec![]);
        assert!(builder.is_over_budget());
        builder.push("d", vec![1], vec![]);
        let trace = builder.finalize();

        assert!(trace.is_empty());
        assert_eq!(
            trace.budget_exceeded(),
            Some(BudgetExceeded {
                requested: 8,
                limit: 4
            })
        );
    }

    #[test]
    fn test_progress_label() {
        let mut builder = TraceBuilder::new(Algorithm::Kruskal);
        builder.push("a", vec![], vec![]);
        builder.push("b", vec![], vec![]);
        let trace = builder.finalize();
        assert_eq!(trace.steps()[1].progress(), "step 2 of 2");
    }

    #[test]
    fn test_step_serializes_with_wire_names() {
        let mut builder = TraceBuilder::new(Algorithm::Dijkstra);
        builder.visit_node(1);
        builder.push("Start", vec![1], vec![]);
        let trace = builder.finalize();
        let json = serde_json::to_value(&trace.steps()[0]).unwrap();
        assert_eq!(json["step_index"], 0);
        assert_eq!(json["total_steps"], 1);
        assert_eq!(json["algorithm"], "dijkstra");
        assert_eq!(json["visited_nodes"], serde_json::json!([1]));
    }
}
