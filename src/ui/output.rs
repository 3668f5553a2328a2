//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Human output respects the quiet flag. When `--json` is enabled, each
//! command prints exactly one JSON document to stdout instead.

use std::fmt::Display;

use serde::Serialize;

use crate::core::object::{Commit, Signature, TreeEntry};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. Quiet wins over debug.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a value as pretty JSON (always shown).
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a list of items, one per line.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Name <email> <timestamp> <+hhmm>`, as in raw commit headers.
pub fn format_signature(sig: &Signature) -> String {
    let offset = sig.offset_minutes();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!(
        "{} {} {}{:02}{:02}",
        sig,
        sig.timestamp(),
        sign,
        offset / 60,
        offset % 60
    )
}

/// One `git log --oneline` style line.
pub fn format_commit_line(commit: &Commit) -> String {
    format!("{} {}", commit.id().short(7), commit.summary())
}

/// One `git ls-tree` style line.
pub fn format_tree_entry(entry: &TreeEntry) -> String {
    format!("{} {} {}\t{}", entry.mode(), entry.kind(), entry.id(), entry.name())
}
