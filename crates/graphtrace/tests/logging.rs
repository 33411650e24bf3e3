//! Tests for logging functionality
//!
//! Only one global subscriber can be installed per test binary, so these
//! tests check that initialization never panics and that tracing works
//! whichever call won.

use graphtrace::core::logging::{init_default_logging, init_logging, LogFormat};
use graphtrace::prelude::*;
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
    assert!(LogFormat::from_str("syslog").is_err());
}

#[test]
fn test_init_logging_with_levels() {
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("warn"), Some("json"));
    let _ = init_logging(Some("off"), Some("pretty"));
}

#[test]
fn test_init_logging_per_engine_directive() {
    let _ = init_logging(Some("info,graphtrace::engines::dijkstra=trace"), None);
}

#[test]
fn test_init_default_logging() {
    let _ = init_default_logging();
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_tracing_with_subscriber_installed() {
    let _ = init_logging(Some("trace"), Some("compact"));

    let request = RunRequest::new("bellman_ford", GraphType::Directed)
        .with_node_ids([1, 2, 3])
        .with_edges([
            Edge::weighted(1, 1, 2, 1.0),
            Edge::weighted(2, 2, 3, -2.0),
            Edge::weighted(3, 3, 2, 1.0),
        ]);
    // negative cycle path logs a warning; the trace is still produced
    let steps = graphtrace::trace(&request).unwrap();
    assert!(steps
        .last()
        .unwrap()
        .description
        .starts_with("⚠ Algorithm terminated"));
}
