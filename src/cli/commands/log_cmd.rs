//! log command - Display commit history
//!
//! Walks history from a revision, newest first, one line per commit.

use anyhow::{Context as _, Result};
use serde_json::json;

use super::Context;
use crate::core::cancel::CancellationToken;
use crate::git::WalkOptions;
use crate::ui::output;

pub fn log(ctx: &Context, rev: &str, max_count: Option<usize>, first_parent: bool) -> Result<()> {
    let repo = ctx.open_repository()?;
    let start = repo
        .resolve_revision(&format!("{rev}^{{commit}}"))
        .with_context(|| format!("'{rev}' does not name a commit"))?;

    let options = WalkOptions {
        first_parent,
        limit: max_count,
        ..Default::default()
    };
    let walk = repo.walk(&start, options, &CancellationToken::new())?;

    let mut rows = Vec::new();
    for commit in walk {
        let commit = commit?;
        if ctx.json {
            rows.push(json!({
                "id": commit.id(),
                "parents": commit.parents(),
                "author": commit.author().to_string(),
                "time": commit.author().when().to_rfc3339(),
                "summary": commit.summary(),
            }));
        } else {
            output::print(output::format_commit_line(&commit), ctx.verbosity);
        }
    }

    if ctx.json {
        output::print_json(&rows)?;
    }
    Ok(())
}
