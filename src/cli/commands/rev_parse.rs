//! rev-parse and resolve commands - Print object ids

use anyhow::Result;
use serde_json::json;

use super::Context;
use crate::ui::output;

/// Print the id a revision expression names.
pub fn rev_parse(ctx: &Context, rev: &str) -> Result<()> {
    let repo = ctx.open_repository()?;
    let id = repo.resolve_revision(rev)?;

    if ctx.json {
        output::print_json(&json!({ "rev": rev, "id": id }))?;
    } else {
        output::print(id, ctx.verbosity);
    }
    Ok(())
}

/// Print the id a reference name or shorthand resolves to.
pub fn resolve(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.open_repository()?;
    let id = repo.resolve(name)?;

    if ctx.json {
        output::print_json(&json!({ "name": name, "id": id }))?;
    } else {
        output::print(id, ctx.verbosity);
    }
    Ok(())
}
