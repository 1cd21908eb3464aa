pub mod cli;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod scenario;
pub mod writer;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Settings};
use crate::model::ModelState;

/// Exit status for a malformed invocation.
pub const EXIT_USAGE: u8 = 1;
/// Exit status for any failure while reading or running the program.
pub const EXIT_FAILURE: u8 = 2;

/// Install the stderr log subscriber; `RUST_LOG` overrides the filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run() -> ExitCode {
    init_logging();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run_program(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

pub fn run_program(args: &Cli) -> anyhow::Result<ModelState> {
    let settings = Settings::from(args);

    // 1. ── Read ───────────────────────────────────────────────────────
    let commands = parser::read_program(&args.program, &settings)?;

    // 2. ── Execute ────────────────────────────────────────────────────
    let stdout = io::stdout().lock();
    let state = processor::execute(&commands, &settings, stdout)
        .with_context(|| format!("Running {}", args.program.display()))?;

    if let Ok(json) = serde_json::to_string(&state) {
        debug!(state = %json, "final model state");
    }
    Ok(state)
}
