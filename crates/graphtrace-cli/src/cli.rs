//! Command-line interface for the graphtrace utility
//!
//! Reads a JSON run request, traces the requested algorithm and prints the
//! steps as JSON or as a human-readable listing.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::{format_step, format_trace};
use graphtrace::core::logging::{init_logging, FORMAT_ENV, LEVEL_ENV};
use graphtrace::{Algorithm, GraphModel, NodeId, Orchestrator, RunRequest, TraceConfig};

/// Graphtrace - step-by-step traces of graph algorithms
#[derive(Parser)]
#[command(name = "graphtrace")]
#[command(about = "Generate step-by-step execution traces of classic graph algorithms")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Maximum number of nodes accepted in a request
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Maximum number of edges accepted in a request
    #[arg(long)]
    pub max_edges: Option<usize>,

    /// Maximum number of node and edge ids a trace may store across its steps
    #[arg(long)]
    pub max_trace_ids: Option<usize>,
}

impl Cli {
    /// `base` with the `--max-*` flags applied over it
    pub fn limits(&self, base: TraceConfig) -> TraceConfig {
        TraceConfig {
            max_nodes: self.max_nodes.unwrap_or(base.max_nodes),
            max_edges: self.max_edges.unwrap_or(base.max_edges),
            max_trace_ids: self.max_trace_ids.unwrap_or(base.max_trace_ids),
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Request overrides shared by `run` and `step`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Input file containing a JSON run request (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the request's algorithm tag
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Override the start node id
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<NodeId>,

    /// Override the target node id (A* only)
    #[arg(long, allow_negative_numbers = true)]
    pub target: Option<NodeId>,
}

impl RequestArgs {
    fn apply(&self, request: &mut RunRequest) {
        if let Some(algorithm) = &self.algorithm {
            request.algorithm = algorithm.clone();
        }
        if let Some(start) = self.start {
            request.start_node_id = Some(start);
        }
        if let Some(target) = self.target {
            request.target_node_id = Some(target);
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trace an algorithm and print every step
    Run {
        #[command(flatten)]
        request: RequestArgs,

        /// Output file for the trace (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// When to use colors in text output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Trace an algorithm and print a single step
    Step {
        #[command(flatten)]
        request: RequestArgs,

        /// Zero-based step index
        #[arg(long, allow_negative_numbers = true)]
        index: i64,

        /// Output file for the step (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show supported algorithms
    Algorithms {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate a run request without tracing it
    Validate {
        #[command(flatten)]
        request: RequestArgs,
    },
}

/// Output formats for traces and steps
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The step records as JSON
    #[default]
    Json,
    /// A human-readable step listing
    Text,
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct GraphtraceApp {
    orchestrator: Orchestrator,
}

impl GraphtraceApp {
    /// Create a new application instance with limits from the environment
    pub fn new() -> Self {
        Self::with_config(TraceConfig::from_env())
    }

    /// Create a new application instance with explicit limits
    pub fn with_config(config: TraceConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new().with_config(config),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var(LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var(FORMAT_ENV)
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Graphtrace v{}", env!("CARGO_PKG_VERSION"));
        }

        let current = *self.orchestrator.config();
        let config = cli.limits(current);
        if config != current {
            debug!(
                max_nodes = config.max_nodes,
                max_edges = config.max_edges,
                max_trace_ids = config.max_trace_ids,
                "Limits overridden from flags"
            );
            self.orchestrator = Orchestrator::new().with_config(config);
        }

        match cli.command {
            Commands::Run {
                request,
                output,
                format,
                pretty,
                color,
            } => self.run_command(&request, output, format, pretty, color, cli.verbose),
            Commands::Step {
                request,
                index,
                output,
                format,
                pretty,
            } => self.step_command(&request, index, output, format, pretty, cli.verbose),
            Commands::Algorithms { json } => self.algorithms_command(json, cli.verbose),
            Commands::Validate { request } => self.validate_command(&request, cli.verbose),
        }
    }

    /// Handle the run command
    fn run_command(
        &self,
        args: &RequestArgs,
        output: Option<PathBuf>,
        format: OutputFormat,
        pretty: bool,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let request = self.load_request(args, verbose)?;
        let created = self.orchestrator.create_run(&request)?;
        if verbose {
            eprintln!(
                "Run {} traced {} in {} steps",
                created.run_id, created.algorithm, created.total_steps
            );
        }

        let run = self.orchestrator.steps(&created.run_id)?;
        debug!(run_id = %created.run_id, format = ?format, "Rendering trace");
        let rendered = match format {
            OutputFormat::Json => to_json(&run.trace, pretty)?,
            OutputFormat::Text => {
                let colorize = self.should_colorize(&output, color);
                format_trace(&run.trace, colorize)
            }
        };
        self.write_output(output, &rendered)
    }

    /// Handle the step command
    fn step_command(
        &self,
        args: &RequestArgs,
        index: i64,
        output: Option<PathBuf>,
        format: OutputFormat,
        pretty: bool,
        verbose: bool,
    ) -> Result<()> {
        let request = self.load_request(args, verbose)?;
        let created = self.orchestrator.create_run(&request)?;
        let step = self.orchestrator.step(&created.run_id, index)?;
        debug!(run_id = %created.run_id, index, "Rendering step");

        let rendered = match format {
            OutputFormat::Json => to_json(&step, pretty)?,
            OutputFormat::Text => {
                let width = step.total_steps.to_string().len();
                format_step(&step, width, false)
            }
        };
        self.write_output(output, &rendered)
    }

    /// Handle the algorithms command
    fn algorithms_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported algorithms");
        }

        if json {
            let algorithms: Vec<_> = Algorithm::ALL
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "tag": a.tag(),
                        "name": a.display_name(),
                        "weighted": a.is_weighted(),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "supported_algorithms": algorithms,
                "total": Algorithm::ALL.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Supported algorithms:");
            for algorithm in Algorithm::ALL {
                println!("  {:<12} - {}", algorithm.tag(), algorithm.display_name());
            }
            println!();
            println!("Total: {} algorithms supported", Algorithm::ALL.len());
        }

        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, args: &RequestArgs, verbose: bool) -> Result<()> {
        let request = self.load_request(args, verbose)?;
        match self.orchestrator.prepare(&request) {
            Ok((algorithm, graph)) => {
                println!(
                    "✓ Valid {} request ({} nodes, {} edges)",
                    algorithm,
                    graph.node_ids().len(),
                    graph.edge_list().len()
                );
                if verbose {
                    print_graph_summary(&graph);
                }
                Ok(())
            }
            Err(e) => {
                info!(error = %e, "Request failed validation");
                println!("✗ Invalid request: {}", e);
                Err(e.into())
            }
        }
    }

    /// Read, parse and override a run request
    fn load_request(&self, args: &RequestArgs, verbose: bool) -> Result<RunRequest> {
        let content = self.read_input(args.input.clone())?;
        debug!(bytes = content.len(), "Read run request");
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let mut request: RunRequest =
            serde_json::from_str(&content).context("Failed to parse run request JSON")?;
        args.apply(&mut request);
        Ok(request)
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                debug!(path = %path.display(), bytes = content.len(), "Wrote output file");
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Get a reference to the orchestrator (for testing)
    #[cfg(test)]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

impl Default for GraphtraceApp {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn print_graph_summary(graph: &GraphModel) {
    eprintln!("  graph type: {}", graph.graph_type());
    if let Some(start) = graph.start() {
        eprintln!("  start node: {}", start);
    }
    if let Some(target) = graph.target() {
        eprintln!("  target node: {}", target);
    }
}
