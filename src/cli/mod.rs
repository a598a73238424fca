//! cli
//!
//! Command-line interface for the AutoPlaylist client.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging
//! - Load config and stored credentials, dispatch, then store credentials
//!   back so a refreshed access credential survives the process
//!
//! When the gateway terminates the session during a command, the handler
//! installed by [`Context::backend`] reports it and the process exits with
//! a failure status.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;

pub use args::{Cli, Command, GenerateArgs, Shell};
pub use context::Context;

use std::process::ExitCode;

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use output::Verbosity;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    // Completion needs neither config nor credentials.
    if let Command::Completion { shell } = cli.command {
        commands::completion(shell)?;
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = Context::load(cli.base_url.clone(), Verbosity::from_flags(cli.quiet, cli.debug))?;
    let result = commands::dispatch(&cli.command, &ctx);
    let persisted = ctx.persist();

    if ctx.session_terminated() {
        if let Err(e) = &result {
            debug!(error = %e, "command failed after session termination");
        }
        persisted?;
        return Ok(ExitCode::FAILURE);
    }

    result?;
    persisted?;
    Ok(ExitCode::SUCCESS)
}

/// Log to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--debug`.
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
