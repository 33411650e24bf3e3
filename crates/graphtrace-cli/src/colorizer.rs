//! Terminal rendering of step listings
//!
//! Applies ANSI escape codes to step descriptions using crossterm.

use crossterm::style::{Color, Stylize};
use graphtrace::{Step, StepTrace};

/// Coarse classification of a step description, used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Algorithm start or queue bookkeeping
    Start,
    /// Node visited, discovered or relaxed
    Progress,
    /// Edge accepted into a tree, or path found
    Accept,
    /// Edge skipped
    Reject,
    /// Negative cycle, missing path, incomplete tree
    Failure,
    /// Final summary
    Summary,
}

impl StepKind {
    pub fn classify(description: &str) -> Self {
        if description.starts_with('⚠')
            || (description.starts_with('✗') && description.contains("No path"))
            || description.contains("incomplete")
        {
            StepKind::Failure
        } else if description.starts_with('✗') {
            StepKind::Reject
        } else if description.starts_with('✓') {
            StepKind::Accept
        } else if description.contains("complete!") {
            StepKind::Summary
        } else if description.starts_with("Start") || description.starts_with("Iteration") {
            StepKind::Start
        } else {
            StepKind::Progress
        }
    }

    fn color(&self) -> Color {
        match self {
            StepKind::Start => Color::Cyan,
            StepKind::Progress => Color::Reset,
            StepKind::Accept => Color::Green,
            StepKind::Reject => Color::Yellow,
            StepKind::Failure => Color::Red,
            StepKind::Summary => Color::Green,
        }
    }
}

/// Render a whole trace as a human-readable listing
///
/// One block per step: a progress header with the description, then the
/// highlighted elements and the size of the visited sets.
pub fn format_trace(trace: &StepTrace, colorize: bool) -> String {
    if trace.is_empty() {
        return format!("{}: no steps (empty graph)\n", trace.algorithm().display_name());
    }

    let width = trace.len().to_string().len();
    let mut result = String::new();
    for step in trace {
        result.push_str(&format_step(step, width, colorize));
    }
    result
}

/// Render a single step
pub fn format_step(step: &Step, width: usize, colorize: bool) -> String {
    let header = format!(
        "[{:>width$}/{}]",
        step.step_index + 1,
        step.total_steps,
        width = width
    );
    let kind = StepKind::classify(&step.description);
    let indent = " ".repeat(header.chars().count() + 1);

    let mut line = String::new();
    if colorize {
        line.push_str(&format!("{}", header.with(Color::DarkGrey)));
        line.push(' ');
        let description = step.description.clone().with(kind.color());
        if kind == StepKind::Summary {
            line.push_str(&format!("{}", description.bold()));
        } else {
            line.push_str(&format!("{}", description));
        }
    } else {
        line.push_str(&header);
        line.push(' ');
        line.push_str(&step.description);
    }
    line.push('\n');

    if !step.highlight_nodes.is_empty() || !step.highlight_edges.is_empty() {
        let nodes = format!("nodes {:?}", step.highlight_nodes);
        let edges = format!("edges {:?}", step.highlight_edges);
        if colorize {
            line.push_str(&format!(
                "{}{}  {}\n",
                indent,
                nodes.with(Color::Cyan),
                edges.with(Color::Yellow)
            ));
        } else {
            line.push_str(&format!("{}{}  {}\n", indent, nodes, edges));
        }
    }

    let visited = format!(
        "visited {} nodes, {} edges",
        step.visited_nodes.len(),
        step.visited_edges.len()
    );
    if colorize {
        line.push_str(&format!("{}{}\n", indent, visited.with(Color::DarkGrey)));
    } else {
        line.push_str(&format!("{}{}\n", indent, visited));
    }
    line
}
