//! show command - Display one object
//!
//! Commits and tags print their headers and message, trees print one line
//! per entry, and blobs print their content.

use anyhow::Result;
use serde_json::{json, Value};

use super::Context;
use crate::core::object::{Blob, Commit, Object, Tag, Tree};
use crate::ui::output::{self, format_signature, format_tree_entry};

pub fn show(ctx: &Context, rev: &str) -> Result<()> {
    let repo = ctx.open_repository()?;
    let id = repo.resolve_revision(rev)?;
    let object = repo.lookup_object(&id)?;

    if ctx.json {
        output::print_json(&object_json(&object))?;
        return Ok(());
    }

    let text = match &object {
        Object::Commit(commit) => commit_text(commit),
        Object::Tree(tree) => tree_text(tree),
        Object::Blob(blob) => blob_text(blob),
        Object::Tag(tag) => tag_text(tag),
    };
    output::print(text, ctx.verbosity);
    Ok(())
}

fn commit_text(commit: &Commit) -> String {
    let mut lines = vec![format!("commit {}", commit.id()), format!("tree {}", commit.tree())];
    lines.extend(commit.parents().iter().map(|parent| format!("parent {parent}")));
    lines.push(format!("author {}", format_signature(commit.author())));
    lines.push(format!("committer {}", format_signature(commit.committer())));
    lines.push(String::new());
    lines.extend(commit.message().lines().map(|line| format!("    {line}")));
    lines.join("\n")
}

fn tree_text(tree: &Tree) -> String {
    tree.iter().map(format_tree_entry).collect::<Vec<_>>().join("\n")
}

fn blob_text(blob: &Blob) -> String {
    match blob.as_text() {
        Some(text) if !blob.is_binary() => text.trim_end_matches('\n').to_string(),
        _ => format!("<binary blob {}, {} bytes>", blob.id().short(7), blob.size()),
    }
}

fn tag_text(tag: &Tag) -> String {
    let target = tag.target();
    let mut lines = vec![
        format!("tag {}", tag.name()),
        format!("object {}", target.id),
        format!("type {}", target.kind),
    ];
    if let Some(tagger) = tag.tagger() {
        lines.push(format!("tagger {}", format_signature(tagger)));
    }
    lines.push(String::new());
    lines.push(tag.message().trim_end().to_string());
    lines.join("\n")
}

fn signature_json(sig: &crate::core::object::Signature) -> Value {
    json!({
        "name": sig.name(),
        "email": sig.email(),
        "time": sig.when().to_rfc3339(),
    })
}

fn object_json(object: &Object) -> Value {
    match object {
        Object::Commit(commit) => json!({
            "kind": "commit",
            "id": commit.id(),
            "tree": commit.tree(),
            "parents": commit.parents(),
            "author": signature_json(commit.author()),
            "committer": signature_json(commit.committer()),
            "message": commit.message(),
        }),
        Object::Tree(tree) => json!({
            "kind": "tree",
            "id": tree.id(),
            "entries": tree.iter().map(|entry| json!({
                "name": entry.name(),
                "mode": entry.mode().to_string(),
                "kind": entry.kind(),
                "id": entry.id(),
            })).collect::<Vec<_>>(),
        }),
        Object::Blob(blob) => json!({
            "kind": "blob",
            "id": blob.id(),
            "size": blob.size(),
            "binary": blob.is_binary(),
            "text": if blob.is_binary() { None } else { blob.as_text() },
        }),
        Object::Tag(tag) => json!({
            "kind": "tag",
            "id": tag.id(),
            "name": tag.name(),
            "target": tag.target(),
            "tagger": tag.tagger().map(signature_json),
            "message": tag.message(),
        }),
    }
}
