//! Run orchestrator
//!
//! Coordinates one request through the pipeline:
//! parse tag → Graph Model → validation → engine → registry

use std::sync::Arc;
use tracing::{debug, info, span, warn, Level};

use super::engine_for;
use crate::core::{
    Algorithm, GraphModel, InMemoryRegistry, Result, Run, RunCreated, RunId, RunInfo,
    RunRegistry, RunRequest, Step, StepTrace, TraceConfig, TraceError,
};

/// Run service over an injectable registry
///
/// Engines never see the registry; the orchestrator stores only finalized
/// traces, so readers never observe a partial run.
pub struct Orchestrator<R: RunRegistry = InMemoryRegistry> {
    registry: R,
    config: TraceConfig,
}

impl Orchestrator<InMemoryRegistry> {
    /// Create an orchestrator with an in-memory registry and default limits
    pub fn new() -> Self {
        Self::with_registry(InMemoryRegistry::new())
    }
}

impl Default for Orchestrator<InMemoryRegistry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RunRegistry> Orchestrator<R> {
    /// Create an orchestrator over the given registry
    pub fn with_registry(registry: R) -> Self {
        Self {
            registry,
            config: TraceConfig::default(),
        }
    }

    /// Replace the input size limits
    pub fn with_config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Parse and validate a request without running an engine
    pub fn prepare(&self, request: &RunRequest) -> Result<(Algorithm, GraphModel)> {
        let algorithm = request.algorithm.parse::<Algorithm>().inspect_err(|_| {
            warn!(algorithm = %request.algorithm, "Unsupported algorithm requested");
        })?;
        let graph = GraphModel::from_request(request)
            .and_then(|mut graph| {
                graph.check_limits(&self.config)?;
                graph.check_weights_for(algorithm)?;
                graph.set_trace_id_budget(self.config.max_trace_ids);
                Ok(graph)
            })
            .inspect_err(|err| warn!(algorithm = %algorithm, error = %err, "Rejected request"))?;
        Ok((algorithm, graph))
    }

    /// Run the requested algorithm and return its trace without storing it
    pub fn execute(&self, request: &RunRequest) -> Result<StepTrace> {
        let (algorithm, graph) = self.prepare(request)?;
        let execute_span = span!(Level::INFO, "execute", algorithm = %algorithm);
        let _enter = execute_span.enter();

        let trace = engine_for(algorithm).trace(&graph);
        if let Some(exceeded) = trace.budget_exceeded() {
            warn!(
                requested = exceeded.requested,
                limit = exceeded.limit,
                "Trace too large, discarding run"
            );
            return Err(TraceError::InputTooLarge {
                what: "trace ids",
                count: exceeded.requested,
                limit: exceeded.limit,
            });
        }
        debug!(total_steps = trace.len(), "Trace generated");
        Ok(trace)
    }

    /// Run the requested algorithm and store the finalized trace
    pub fn create_run(&self, request: &RunRequest) -> Result<RunCreated> {
        let trace = self.execute(request)?;
        let algorithm = trace.algorithm();
        let total_steps = trace.len();
        let run_id = self.registry.register(Run::new(request.graph_type, trace));
        info!(run_id = %run_id, algorithm = %algorithm, total_steps, "Run created");
        Ok(RunCreated {
            run_id,
            algorithm,
            total_steps,
        })
    }

    /// Summary of a stored run
    pub fn run_info(&self, run_id: &RunId) -> Result<RunInfo> {
        let run = self.registry.get(run_id)?;
        Ok(RunInfo {
            run_id: *run_id,
            algorithm: run.algorithm,
            total_steps: run.total_steps(),
            graph_type: run.graph_type,
        })
    }

    /// One step of a stored run; negative or past-the-end indices are rejected
    pub fn step(&self, run_id: &RunId, index: i64) -> Result<Step> {
        let run = self.registry.get(run_id)?;
        let total_steps = run.total_steps();
        usize::try_from(index)
            .ok()
            .and_then(|i| run.trace.get(i))
            .cloned()
            .ok_or_else(|| {
                debug!(run_id = %run_id, index, total_steps, "Step index out of range");
                TraceError::step_out_of_range(index, total_steps)
            })
    }

    /// The whole stored run
    pub fn steps(&self, run_id: &RunId) -> Result<Arc<Run>> {
        self.registry.get(run_id)
    }
}
