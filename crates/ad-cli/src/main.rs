#![forbid(unsafe_code)]

//! asciidag CLI - turn ASCII commit history drawings into Graphviz DOT.
//!
//! # Commands
//!
//! - `render`: Convert a drawing to DOT (or the full graph as JSON)
//! - `parse`: Output a JSON summary or the full graph for tooling/debugging
//! - `inspect`: List every node with its position and parents

use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;

use ad_core::Graph;
use ad_parser::{parse, parse_summary_json};
use ad_render_dot::{DotRenderConfig, render_dot_with_config};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

/// asciidag CLI - turn ASCII commit history drawings into Graphviz DOT.
#[derive(Debug, Parser)]
#[command(
    name = "asciidag",
    version,
    about = "Turn ASCII commit history drawings into Graphviz DOT",
    long_about = "Reads the kind of history diagram found in git documentation,\n\
        recovers commits, parent links and branch labels, and writes DOT that\n\
        `neato -n` lays out exactly like the original drawing."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a drawing to DOT or JSON.
    Render {
        /// Input file path or "-" for stdin. Text that names no file is parsed inline.
        #[arg(default_value = "-")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "dot")]
        format: OutputFormat,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,

        /// TOML file with DOT render settings
        #[arg(long)]
        config: Option<String>,

        /// Output units per column (overrides the config file)
        #[arg(long)]
        scale_x: Option<usize>,

        /// Output units per row (overrides the config file)
        #[arg(long)]
        scale_y: Option<usize>,

        /// Pin positions with `!` so Graphviz keeps them fixed
        #[arg(long)]
        pin: bool,
    },

    /// Parse a drawing and output a JSON summary.
    Parse {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output the full graph (default is summary)
        #[arg(long)]
        full: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print each node with its position and parents.
    Inspect {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,
    },
}

/// Output format for render command.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    /// Graphviz DOT
    Dot,
    /// The parsed graph as JSON
    Json,
}

/// Command-line overrides layered over the config file.
#[derive(Debug, Default, Clone, Copy)]
struct RenderOverrides {
    scale_x: Option<usize>,
    scale_y: Option<usize>,
    pin: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render {
            input,
            format,
            output,
            config,
            scale_x,
            scale_y,
            pin,
        } => cmd_render(
            &input,
            format,
            output.as_deref(),
            config.as_deref(),
            RenderOverrides {
                scale_x,
                scale_y,
                pin,
            },
        ),

        Command::Parse {
            input,
            full,
            pretty,
        } => cmd_parse(&input, full, pretty),

        Command::Inspect { input } => cmd_inspect(&input),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline drawing
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn load_render_config(path: Option<&str>, overrides: RenderOverrides) -> Result<DotRenderConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .context(format!("Failed to read config: {path}"))?;
            toml::from_str(&text).context(format!("Invalid render config: {path}"))?
        }
        None => DotRenderConfig::default(),
    };

    if let Some(scale_x) = overrides.scale_x {
        config.scale_x = scale_x;
    }
    if let Some(scale_y) = overrides.scale_y {
        config.scale_y = scale_y;
    }
    if overrides.pin {
        config.pin_positions = true;
    }
    Ok(config)
}

fn parse_and_check(source: &str) -> Graph {
    let graph = parse(source);
    if let Err(err) = graph.check_invariants() {
        warn!("Parsed graph is inconsistent: {err}");
    }
    if graph.is_empty() && !source.trim().is_empty() {
        warn!("No commits or branch labels found in input");
    }
    graph
}

// =============================================================================
// Command: render
// =============================================================================

fn cmd_render(
    input: &str,
    format: OutputFormat,
    output: Option<&str>,
    config_path: Option<&str>,
    overrides: RenderOverrides,
) -> Result<()> {
    let config = load_render_config(config_path, overrides)?;
    let source = load_input(input)?;

    let start = Instant::now();
    let graph = parse_and_check(&source);
    debug!(
        "Parsed: nodes={}, edges={}, branch_labels={}",
        graph.nodes.len(),
        graph.edge_count(),
        graph.branch_labels.len()
    );

    let rendered = match format {
        OutputFormat::Dot => render_dot_with_config(&graph, &config),
        OutputFormat::Json => serde_json::to_string_pretty(&graph)?,
    };

    write_output(output, &rendered)?;

    info!(
        "Rendered {} nodes, {} edges in {:.2}ms",
        graph.nodes.len(),
        graph.edge_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

// =============================================================================
// Command: parse
// =============================================================================

fn cmd_parse(input: &str, full: bool, pretty: bool) -> Result<()> {
    let source = load_input(input)?;
    let graph = parse_and_check(&source);
    println!("{}", format_parse_output(&graph, full, pretty)?);
    Ok(())
}

fn format_parse_output(graph: &Graph, full: bool, pretty: bool) -> Result<String> {
    let output = if full {
        if pretty {
            serde_json::to_string_pretty(graph)?
        } else {
            serde_json::to_string(graph)?
        }
    } else if pretty {
        let value: serde_json::Value = serde_json::from_str(&parse_summary_json(graph))?;
        serde_json::to_string_pretty(&value)?
    } else {
        parse_summary_json(graph)
    };
    Ok(output)
}

// =============================================================================
// Command: inspect
// =============================================================================

fn cmd_inspect(input: &str) -> Result<()> {
    let source = load_input(input)?;
    let graph = parse_and_check(&source);
    print!("{}", format_inspect(&graph));
    Ok(())
}

fn format_inspect(graph: &Graph) -> String {
    let mut out = String::new();
    for node in &graph.nodes {
        let _ = write!(out, "{} {} {}", node.id, node.display_label(), node.position);
        let parents: Vec<String> = graph
            .parents_of(node)
            .map(|parent| format!("{} {}", parent.display_label(), parent.position))
            .collect();
        if parents.is_empty() {
            out.push_str(" (root)");
        } else {
            let _ = write!(out, " <- {}", parents.join(", "));
        }
        out.push('\n');
    }
    for branch in &graph.branch_labels {
        let _ = writeln!(
            out,
            "{} label {:?} {}",
            branch.id,
            branch.display_label(),
            branch.position
        );
    }
    out
}
