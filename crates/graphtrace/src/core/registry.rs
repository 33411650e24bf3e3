//! Run registry
//!
//! Stores finalized traces under generated identifiers. The [`RunRegistry`]
//! trait is the seam for alternative stores (TTL cache, persistent store);
//! [`InMemoryRegistry`] is the default, process-wide, concurrent map.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

use super::error::{Result, TraceError};
use super::step::StepTrace;
use super::types::{Algorithm, GraphType};

/// Opaque run identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TraceError::InvalidRunId {
                value: s.to_string(),
            })
    }
}

/// One execution instance owning exactly one finalized trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub algorithm: Algorithm,
    pub graph_type: GraphType,
    pub trace: StepTrace,
}

impl Run {
    pub fn new(graph_type: GraphType, trace: StepTrace) -> Self {
        Self {
            algorithm: trace.algorithm(),
            graph_type,
            trace,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.trace.len()
    }
}

/// Storage abstraction for finalized runs
///
/// Implementations must generate unique ids, store each run atomically and
/// never mutate a stored run.
pub trait RunRegistry: Send + Sync {
    /// Store a run and return its new identifier
    fn register(&self, run: Run) -> RunId;

    /// Look up a stored run
    fn get(&self, id: &RunId) -> Result<Arc<Run>>;

    /// Number of steps of a stored run
    fn count(&self, id: &RunId) -> Result<usize> {
        self.get(id).map(|run| run.total_steps())
    }

    /// Remove a run; returns false if it was not stored
    fn evict(&self, id: &RunId) -> bool;

    /// Number of stored runs
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Concurrent in-memory registry without eviction policy
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    runs: DashMap<RunId, Arc<Run>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers of all stored runs, in no particular order
    pub fn run_ids(&self) -> Vec<RunId> {
        self.runs.iter().map(|entry| *entry.key()).collect()
    }
}

impl RunRegistry for InMemoryRegistry {
    fn register(&self, run: Run) -> RunId {
        let run = Arc::new(run);
        loop {
            let id = RunId::new();
            // entry() holds the shard lock, so check-and-insert is atomic
            if let dashmap::mapref::entry::Entry::Vacant(slot) = self.runs.entry(id) {
                debug!(
                    run_id = %id,
                    algorithm = %run.algorithm,
                    total_steps = run.total_steps(),
                    "Registered run"
                );
                slot.insert(run);
                return id;
            }
        }
    }

    fn get(&self, id: &RunId) -> Result<Arc<Run>> {
        trace!(run_id = %id, "Looking up run");
        self.runs
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| TraceError::run_not_found(id))
    }

    fn evict(&self, id: &RunId) -> bool {
        let removed = self.runs.remove(id).is_some();
        debug!(run_id = %id, removed, "Evicted run");
        removed
    }

    fn len(&self) -> usize {
        self.runs.len()
    }
}

impl<T: RunRegistry + ?Sized> RunRegistry for Arc<T> {
    fn register(&self, run: Run) -> RunId {
        (**self).register(run)
    }

    fn get(&self, id: &RunId) -> Result<Arc<Run>> {
        (**self).get(id)
    }

    fn count(&self, id: &RunId) -> Result<usize> {
        (**self).count(id)
    }

    fn evict(&self, id: &RunId) -> bool {
        (**self).evict(id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::step::TraceBuilder;

    fn sample_run(steps: usize) -> Run {
        let mut builder = TraceBuilder::new(Algorithm::Bfs);
        for i in 0..steps {
            builder.push(format!("step {}", i), vec![], vec![]);
        }
        Run::new(GraphType::Directed, builder.finalize())
    }

    #[test]
    fn test_register_and_get() {
        let registry = InMemoryRegistry::new();
        let id = registry.register(sample_run(3));
        let run = registry.get(&id).unwrap();
        assert_eq!(run.total_steps(), 3);
        assert_eq!(run.algorithm, Algorithm::Bfs);
        assert_eq!(run.graph_type, GraphType::Directed);
        assert_eq!(registry.count(&id).unwrap(), 3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let registry = InMemoryRegistry::new();
        let err = registry.get(&RunId::new()).unwrap_err();
        assert!(err.is_not_found());
        assert!(registry.count(&RunId::new()).is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = InMemoryRegistry::new();
        let a = registry.register(sample_run(1));
        let b = registry.register(sample_run(1));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.run_ids().len(), 2);
    }

    #[test]
    fn test_evict() {
        let registry = InMemoryRegistry::new();
        let id = registry.register(sample_run(2));
        assert!(registry.evict(&id));
        assert!(!registry.evict(&id));
        assert!(registry.is_empty());
        assert!(registry.get(&id).is_err());
    }

    #[test]
    fn test_run_id_parsing() {
        let id = RunId::new();
        let parsed: RunId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        let err = "not-a-uuid".parse::<RunId>().unwrap_err();
        assert!(matches!(err, TraceError::InvalidRunId { .. }));
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(InMemoryRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| registry.register(sample_run(1)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut ids: Vec<RunId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_by_key(|id| id.to_string());
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(registry.len(), 200);
    }
}
