//! remote command - Manage remote configuration

use anyhow::Result;
use serde_json::json;

use super::Context;
use crate::cli::args::RemoteAction;
use crate::ui::output;

pub fn remote(ctx: &Context, action: RemoteAction) -> Result<()> {
    let repo = ctx.open_repository()?;

    match action {
        RemoteAction::List { verbose } => {
            let remotes = repo.remotes()?;
            if ctx.json {
                output::print_json(&remotes)?;
            } else {
                for remote in &remotes {
                    if verbose {
                        output::print(format!("{}\t{}", remote.name, remote.url), ctx.verbosity);
                    } else {
                        output::print(&remote.name, ctx.verbosity);
                    }
                }
            }
        }

        RemoteAction::Show { name } => {
            let remote = repo.find_remote(&name)?;
            if ctx.json {
                output::print_json(&json!({
                    "name": remote.name(),
                    "url": remote.url(),
                    "push_url": remote.push_url(),
                    "fetch_refspecs": remote.fetch_refspecs(),
                    "push_refspecs": remote.push_refspecs(),
                }))?;
            } else {
                let mut lines = vec![
                    format!("remote {}", remote.name()),
                    format!("  fetch url: {}", remote.url()),
                    format!("  push url:  {}", remote.effective_push_url()),
                ];
                lines.extend(
                    remote
                        .fetch_refspecs()
                        .iter()
                        .map(|spec| format!("  fetch:     {spec}")),
                );
                output::print(lines.join("\n"), ctx.verbosity);
            }
        }

        RemoteAction::Add { name, url } => {
            repo.create_remote(&name, &url)?;
            output::print(format!("Added remote '{name}' ({url})"), ctx.verbosity);
        }

        RemoteAction::Remove { name } => {
            repo.delete_remote(&name)?;
            output::print(format!("Removed remote '{name}'"), ctx.verbosity);
        }

        RemoteAction::SetUrl { name, url, push } => {
            if push {
                repo.set_remote_push_url(&name, Some(&url))?;
            } else {
                repo.set_remote_url(&name, &url)?;
            }
            output::print(format!("Updated remote '{name}'"), ctx.verbosity);
        }

        RemoteAction::Rename { old, new } => {
            for problem in repo.rename_remote(&old, &new)? {
                output::warn(
                    format!("refspec '{problem}' was not updated"),
                    ctx.verbosity,
                );
            }
            output::print(format!("Renamed remote '{old}' to '{new}'"), ctx.verbosity);
        }
    }

    Ok(())
}
