//! Core error types for trace generation
//!
//! This module defines the error taxonomy shared by the graph adapter,
//! the algorithm dispatcher and the run registry.

use thiserror::Error;

/// Core error types for trace generation
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Step not found: index {index} is outside 0..{total_steps}")]
    StepOutOfRange { index: i64, total_steps: usize },

    #[error("Unsupported algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    #[error("Malformed graph: {message}")]
    MalformedGraph { message: String },

    #[error("Input too large: {count} {what} exceeds the limit of {limit}")]
    InputTooLarge {
        what: &'static str,
        count: usize,
        limit: usize,
    },

    #[error("Invalid run id: {value}")]
    InvalidRunId { value: String },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TraceError {
    /// Create a new run-not-found error
    pub fn run_not_found(run_id: impl ToString) -> Self {
        Self::RunNotFound {
            run_id: run_id.to_string(),
        }
    }

    /// Create a new step-out-of-range error
    pub fn step_out_of_range(index: i64, total_steps: usize) -> Self {
        Self::StepOutOfRange { index, total_steps }
    }

    /// Create a new unsupported-algorithm error
    pub fn unsupported_algorithm(name: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm { name: name.into() }
    }

    /// Create a new malformed-graph error
    pub fn malformed_graph(message: impl Into<String>) -> Self {
        Self::MalformedGraph {
            message: message.into(),
        }
    }

    /// Returns true for identifier and index errors that callers surface as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TraceError::RunNotFound { .. }
                | TraceError::StepOutOfRange { .. }
                | TraceError::InvalidRunId { .. }
        )
    }

    /// Returns true for errors caused by the request payload itself
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            TraceError::UnsupportedAlgorithm { .. }
                | TraceError::MalformedGraph { .. }
                | TraceError::InputTooLarge { .. }
                | TraceError::Json { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TraceError>;
