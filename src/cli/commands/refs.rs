//! refs, branches and tags commands - List references

use anyhow::Result;
use serde_json::{json, Value};

use super::Context;
use crate::core::reference::{Reference, ReferenceTarget};
use crate::ui::output;

fn reference_json(reference: &Reference) -> Value {
    match reference.target() {
        ReferenceTarget::Direct(id) => json!({ "name": reference.name(), "id": id }),
        ReferenceTarget::Symbolic(target) => {
            json!({ "name": reference.name(), "symbolic": target })
        }
    }
}

/// List references, optionally restricted to a prefix.
pub fn refs(ctx: &Context, prefix: Option<&str>) -> Result<()> {
    let repo = ctx.open_repository()?;
    let references = repo.references(prefix)?;

    if ctx.json {
        let rows: Vec<_> = references.iter().map(reference_json).collect();
        output::print_json(&rows)?;
    } else if !references.is_empty() {
        output::print(output::format_list(&references, ""), ctx.verbosity);
    }
    Ok(())
}

/// List local or remote-tracking branches.
pub fn branches(ctx: &Context, remote: bool) -> Result<()> {
    let repo = ctx.open_repository()?;
    let branches = if remote {
        repo.remote_branches()?
    } else {
        repo.local_branches()?
    };

    // Current branch marker, only meaningful for local branches
    let current = repo
        .head()
        .ok()
        .and_then(|head| head.symbolic_target().cloned());

    if ctx.json {
        let rows: Vec<_> = branches
            .iter()
            .map(|branch| {
                json!({
                    "name": branch.short_name(),
                    "ref": branch.name(),
                    "commit": branch.commit(),
                    "current": current.as_ref() == Some(branch.name()),
                })
            })
            .collect();
        output::print_json(&rows)?;
        return Ok(());
    }

    for branch in &branches {
        let marker = if current.as_ref() == Some(branch.name()) {
            "* "
        } else {
            "  "
        };
        output::print(
            format!("{marker}{} {}", branch.short_name(), branch.commit().short(7)),
            ctx.verbosity,
        );
    }
    Ok(())
}

/// List tags with what they point at.
pub fn tags(ctx: &Context) -> Result<()> {
    let repo = ctx.open_repository()?;
    let tags = repo.tags()?;

    if ctx.json {
        let rows: Vec<_> = tags
            .iter()
            .map(|tag| {
                json!({
                    "name": tag.short_name(),
                    "annotated": tag.is_annotated(),
                    "id": tag.id(),
                    "target": tag.target(),
                })
            })
            .collect();
        output::print_json(&rows)?;
        return Ok(());
    }

    for tag in &tags {
        let target = tag.target();
        let kind = if tag.is_annotated() { "annotated" } else { "lightweight" };
        output::print(
            format!("{} {} {} ({kind})", tag.short_name(), target.kind, target.id.short(7)),
            ctx.verbosity,
        );
    }
    Ok(())
}
