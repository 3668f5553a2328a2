//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository through [`Context::open_repository`]
//! 2. Calls [`crate::git::Repository`] operations
//! 3. Formats and displays output, as JSON when `--json` is set

mod log_cmd;
mod refs;
mod remote;
mod rev_parse;
mod show;

pub use log_cmd::log;
pub use refs::{branches, refs, tags};
pub use remote::remote;
pub use rev_parse::{resolve, rev_parse};
pub use show::show;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::debug;

use super::args::Command;
use crate::core::config::Config;
use crate::git::{Repository, RepositoryOptions};
use crate::ui::output::Verbosity;

/// Execution context shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory to run in (defaults to the current directory)
    pub cwd: Option<PathBuf>,
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Print JSON output
    pub json: bool,
}

impl Context {
    /// Open the repository containing the working directory.
    ///
    /// Global configuration decides how the repository is opened; the
    /// repository's own configuration is applied once it is found.
    pub fn open_repository(&self) -> Result<Repository> {
        let cwd = match &self.cwd {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        let global = Config::load(None)?;
        let mut repo = Repository::open_with(&cwd, RepositoryOptions::from_config(&global))?;

        let config = Config::load(Some(repo.git_dir()))?;
        debug!(
            global = ?config.global_config_loaded_from(),
            repo = ?config.repo_config_loaded_from(),
            "loaded configuration"
        );
        repo.set_max_symbolic_depth(config.max_symbolic_depth());

        Ok(repo)
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Show { rev } => show::show(ctx, &rev),
        Command::RevParse { rev } => rev_parse::rev_parse(ctx, &rev),
        Command::Resolve { name } => rev_parse::resolve(ctx, &name),
        Command::Refs { prefix } => refs::refs(ctx, prefix.as_deref()),
        Command::Branches { remote } => refs::branches(ctx, remote),
        Command::Tags => refs::tags(ctx),
        Command::Log {
            rev,
            max_count,
            first_parent,
        } => log_cmd::log(ctx, &rev, max_count, first_parent),
        Command::Remote { action } => remote::remote(ctx, action),
    }
}
