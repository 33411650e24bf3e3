//! Core abstractions for trace generation
//!
//! This module defines the graph model every engine consumes, the step trace
//! every engine produces, and the storage seam for finalized runs.

mod engine;
mod error;
mod graph;
pub mod logging;
mod registry;
mod request;
mod step;
mod types;

pub use engine::*;
pub use error::*;
pub use graph::*;
pub use logging::*;
pub use registry::*;
pub use request::*;
pub use step::*;
pub use types::*;
