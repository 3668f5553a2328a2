//! cli
//!
//! Command-line interface layer for gitmodel.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that call [`crate::git::Repository`] and format the results.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::ui::output::Verbosity;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load(None)?;
    init_logging(cli.debug, config.log_level());

    let ctx = commands::Context {
        cwd: cli.cwd.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install a stderr log subscriber.
///
/// `--debug` forces the `debug` level. Otherwise `RUST_LOG` is honored,
/// falling back to the configured level.
fn init_logging(debug: bool, default_level: &str) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    // A subscriber may already be installed when run from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
