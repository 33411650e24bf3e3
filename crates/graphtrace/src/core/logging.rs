//! Logging setup
//!
//! Engines and the orchestrator emit `tracing` events. Native builds route
//! them through a `tracing-subscriber` registry writing to stderr, so a
//! trace printed on stdout is never interleaved with log lines. `wasm32`
//! builds log to the browser console through `tracing-wasm`.
//!
//! ```rust
//! use graphtrace::core::logging::init_logging;
//!
//! // level and format from the environment, falling back to info/compact
//! let _ = init_logging(None, None);
//! ```
//!
//! Settings are resolved in this order: explicit argument, then
//! `GRAPHTRACE_LOG_LEVEL` / `GRAPHTRACE_LOG_FORMAT`, then `RUST_LOG` (level
//! only), then `info` / `compact`. Levels accept full `EnvFilter` directives:
//!
//! ```bash
//! # every step the Dijkstra engine emits
//! GRAPHTRACE_LOG_LEVEL="warn,graphtrace::engines::dijkstra=trace" graphtrace run -i graph.json
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::Layered, layer::SubscriberExt, util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

pub const LEVEL_ENV: &str = "GRAPHTRACE_LOG_LEVEL";
pub const FORMAT_ENV: &str = "GRAPHTRACE_LOG_FORMAT";

/// Output format of the native subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event, no targets
    #[default]
    Compact,
    /// Multi-line, colored, with source locations
    Pretty,
    /// Newline-delimited JSON, with span close events carrying timings
    Json,
}

impl LogFormat {
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }

    fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::variants()
            .iter()
            .zip([LogFormat::Compact, LogFormat::Pretty, LogFormat::Json])
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, format)| format)
            .ok_or_else(|| {
                format!(
                    "Unknown log format: {} (expected one of {})",
                    s,
                    Self::variants().join(", ")
                )
            })
    }
}

/// Level directive and format after applying argument/env precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directives: String,
    pub format: LogFormat,
}

impl LogSettings {
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        let directives = level
            .map(str::to_string)
            .or_else(|| std::env::var(LEVEL_ENV).ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        let format = match format.map(str::to_string).or_else(|| std::env::var(FORMAT_ENV).ok()) {
            Some(name) => name.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self { directives, format })
    }

    /// Filter for the resolved directives; unparsable directives fall back to `info`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directives).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

#[cfg(not(target_arch = "wasm32"))]
fn format_layer(format: LogFormat) -> BoxedLayer {
    let base = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Compact => base
            .compact()
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .boxed(),
        LogFormat::Pretty => base
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::ACTIVE)
            .boxed(),
        LogFormat::Json => base
            .json()
            .with_current_span(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

/// Install the global subscriber
///
/// Fails on an unknown format, or when a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings::resolve(level, format)?;

    #[cfg(target_arch = "wasm32")]
    {
        // the browser console has no format or filter to configure
        let _ = settings;
        tracing_wasm::set_as_global_default_with_config(tracing_wasm::WASMLayerConfig::default());
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing_subscriber::registry()
            .with(settings.filter())
            .with(format_layer(settings.format))
            .try_init()?;
    }

    Ok(())
}

pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("compact, pretty, json"));
    }

    #[test]
    fn test_log_format_display_matches_variants() {
        for name in LogFormat::variants() {
            assert_eq!(name.parse::<LogFormat>().unwrap().to_string(), *name);
        }
    }

    #[test]
    fn test_explicit_arguments_win() {
        let settings = LogSettings::resolve(Some("debug"), Some("pretty")).unwrap();
        assert_eq!(settings.directives, "debug");
        assert_eq!(settings.format, LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(LogSettings::resolve(Some("info"), Some("syslog")).is_err());
    }

    #[test]
    fn test_bad_directive_falls_back() {
        let settings = LogSettings::resolve(Some("info,=[bad"), Some("compact")).unwrap();
        // constructing the filter must not panic
        let _ = settings.filter();
    }
}
