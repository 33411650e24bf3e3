//! WebAssembly bindings for Graphtrace
//!
//! Browser-friendly wrappers that take and return JSON strings. Errors are
//! thrown as JavaScript exceptions.

use wasm_bindgen::prelude::*;

use crate::core::{RunRequest, TraceConfig};
use crate::engines::Orchestrator;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Trace one algorithm run
///
/// # Arguments
/// * `request_json` - A run request: `{"algorithm", "graph_type", "nodes", "edges", ...}`
///
/// # Returns
/// * The step trace as a JSON string
/// * Throws a JavaScript error if the request is malformed or unsupported
#[wasm_bindgen]
pub fn run_algorithm(request_json: &str) -> Result<String, JsValue> {
    let request: RunRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request: {}", e)))?;

    let trace = Orchestrator::new()
        .with_config(TraceConfig::default())
        .execute(&request)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&trace).map_err(|e| JsValue::from_str(&format!("Serialize error: {}", e)))
}

/// Wire tags of all supported algorithms as a JSON array
#[wasm_bindgen]
pub fn supported_algorithms() -> String {
    serde_json::to_string(&crate::supported_algorithms()).unwrap_or_else(|_| "[]".to_string())
}
