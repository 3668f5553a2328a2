//! Architecture enforcement tests.
//!
//! The engine is reachable only through `src/git/`, the library never
//! depends on `anyhow`, and non-test library code propagates errors
//! instead of panicking. These tests catch violations in CI.
//!
//! # Test Categories
//!
//! 1. **Engine Confinement** - Only `git::*` may name `git2`
//! 2. **Error Layering** - `anyhow` is confined to the binary's CLI layer
//! 3. **Panic Freedom** - No `unwrap()` / `expect()` outside tests

use std::fs;
use std::path::{Path, PathBuf};

/// Directories allowed to use the engine crate directly.
const ENGINE_DIRS: &[&str] = &["src/git"];

/// Paths allowed to use `anyhow`.
const ANYHOW_PATHS: &[&str] = &["src/cli", "src/main.rs"];

/// Collect every `.rs` file under `dir`, sorted.
fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).expect("Failed to read source directory") {
            let path = entry.expect("Failed to read entry").path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Source lines that are code, stopping at the first test module.
fn code_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.contains("#[cfg(test)]"))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(i, line)| (i + 1, line))
}

fn is_under(path: &Path, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

// =============================================================================
// Engine Confinement
// =============================================================================

/// Only the `git` module may name `git2`.
///
/// Every other layer works with the crate's own value types, so no engine
/// handle or error can leak through the public API.
#[test]
fn only_git_module_uses_engine() {
    let mut violations = Vec::new();

    for path in rust_files(Path::new("src")) {
        if is_under(&path, ENGINE_DIRS) {
            continue;
        }
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Failed to read {}", path.display()));

        for (line_no, line) in code_lines(&content) {
            if line.contains("git2::") || line.contains("use git2") {
                violations.push(format!("{}:{}: {}", path.display(), line_no, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Engine used outside src/git:\n  {}",
        violations.join("\n  ")
    );
}

// =============================================================================
// Error Layering
// =============================================================================

/// Library modules return typed errors; `anyhow` belongs to the binary.
#[test]
fn anyhow_confined_to_cli() {
    let mut violations = Vec::new();

    for path in rust_files(Path::new("src")) {
        if is_under(&path, ANYHOW_PATHS) {
            continue;
        }
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Failed to read {}", path.display()));

        if code_lines(&content).any(|(_, line)| line.contains("anyhow")) {
            violations.push(path.display().to_string());
        }
    }

    assert!(
        violations.is_empty(),
        "anyhow used in library modules:\n  {}",
        violations.join("\n  ")
    );
}

// =============================================================================
// Panic Freedom
// =============================================================================

/// Non-test code propagates errors with `?` instead of panicking.
#[test]
fn no_unwrap_outside_tests() {
    let mut violations = Vec::new();

    for path in rust_files(Path::new("src")) {
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Failed to read {}", path.display()));

        for (line_no, line) in code_lines(&content) {
            if line.contains(".unwrap()") || line.contains(".expect(") {
                violations.push(format!("{}:{}: {}", path.display(), line_no, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Panicking calls in non-test code:\n  {}",
        violations.join("\n  ")
    );
}

/// Sanity check that the lints actually see the source tree.
#[test]
fn lints_cover_every_layer() {
    let files = rust_files(Path::new("src"));
    for layer in ["src/core", "src/git", "src/cli", "src/ui"] {
        assert!(
            files.iter().any(|path| path.starts_with(layer)),
            "no sources found under {layer}"
        );
    }
}
