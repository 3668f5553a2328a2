//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitmodel - Inspect Git repositories through a typed object model
#[derive(Parser, Debug)]
#[command(name = "gitmodel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gitmodel was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the object a revision names
    #[command(after_help = "\
EXAMPLES:
    gitmodel show HEAD
    gitmodel show 'HEAD^{tree}'
    gitmodel show v1.0")]
    Show {
        /// Revision expression
        rev: String,
    },

    /// Print the object id a revision names
    #[command(name = "rev-parse")]
    RevParse {
        /// Revision expression
        rev: String,
    },

    /// Resolve a reference name or shorthand to an object id
    Resolve {
        /// Full or abbreviated reference name (e.g. `main`, `origin/main`)
        name: String,
    },

    /// List references
    Refs {
        /// Only references starting with this prefix (e.g. `refs/tags/`)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// List branches
    Branches {
        /// List remote-tracking branches instead of local ones
        #[arg(short, long)]
        remote: bool,
    },

    /// List tags
    Tags,

    /// Show commit history
    Log {
        /// Revision to start from
        #[arg(default_value = "HEAD")]
        rev: String,

        /// Show at most this many commits
        #[arg(short = 'n', long = "max-count")]
        max_count: Option<usize>,

        /// Follow only the first parent of merge commits
        #[arg(long)]
        first_parent: bool,
    },

    /// Manage remotes
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },
}

/// Remote subcommands.
#[derive(Subcommand, Debug)]
pub enum RemoteAction {
    /// List remotes
    List {
        /// Also show URLs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show one remote's configuration
    Show {
        /// Remote name
        name: String,
    },

    /// Add a remote
    Add {
        /// Remote name
        name: String,
        /// Fetch URL
        url: String,
    },

    /// Remove a remote
    Remove {
        /// Remote name
        name: String,
    },

    /// Change a remote's URL
    #[command(name = "set-url")]
    SetUrl {
        /// Remote name
        name: String,
        /// New URL
        url: String,
        /// Set the push URL instead of the fetch URL
        #[arg(long)]
        push: bool,
    },

    /// Rename a remote
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_log_flags() {
        let cli = Cli::try_parse_from(["gitmodel", "log", "main", "-n", "3", "--first-parent"])
            .unwrap();
        match cli.command {
            Command::Log {
                rev,
                max_count,
                first_parent,
            } => {
                assert_eq!(rev, "main");
                assert_eq!(max_count, Some(3));
                assert!(first_parent);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gitmodel", "refs", "--json", "--quiet"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn remote_set_url_push() {
        let cli = Cli::try_parse_from([
            "gitmodel",
            "remote",
            "set-url",
            "origin",
            "git@example.com:r.git",
            "--push",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Remote {
                action: RemoteAction::SetUrl { push: true, .. }
            }
        ));
    }
}
