//! # WBC Controller
//!
//! Loads the controller TOML, generates the configured solver and serves
//! JSON-lines events from stdin (or `--input`) until end of input. Commands,
//! feedback and the goal echo are written to stdout as JSON envelopes; logs go
//! to stderr.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use wbc_common::config::load_controller_config;
use wbc_controller::transport::JsonLinesSink;
use wbc_controller::{build_control_loop, serve};
use wbc_solver::SolverRegistry;

/// WBC Controller - reactive whole-body velocity control
#[derive(Parser, Debug)]
#[command(name = "wbc_controller")]
#[command(version)]
#[command(about = "Reactive whole-body control loop over JSON-lines events")]
struct Args {
    /// Path to the controller configuration TOML.
    #[arg(short, long, default_value = "config/controller.toml")]
    config: PathBuf,

    /// Read events from this file instead of stdin.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("WBC Controller v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("WBC Controller shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_controller_config(&args.config)?;
    info!(
        "Config OK: {} joints, solver '{}'",
        config.joint_names.len(),
        config.solver.kind
    );

    let registry = SolverRegistry::with_builtin();
    let sink = JsonLinesSink::new(io::stdout().lock());
    let mut control = build_control_loop(&config, &registry, sink)?;

    let summary = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open input {}: {e}", path.display()))?;
            serve(BufReader::new(file), &mut control)?
        }
        None => serve(io::stdin().lock(), &mut control)?,
    };

    info!(
        "Input closed: {} events, {} malformed lines",
        summary.events, summary.malformed
    );
    info!("Final stats: {}", control.stats());
    Ok(())
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
