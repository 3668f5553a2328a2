//! gitmodel - A typed object model over Git repositories
//!
//! gitmodel wraps libgit2 with strongly typed, immutable values for
//! commits, trees, blobs, tags, references and remotes, and a single error
//! taxonomy in place of raw engine codes.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Engine-independent domain types and configuration
//! - [`git`] - Single interface to the engine: the [`git::Repository`] handle
//! - [`cli`] - Command-line interface layer for the `gitmodel` binary
//! - [`ui`] - Terminal output for the binary
//!
//! # Correctness Invariants
//!
//! 1. Values exist only if the engine returned matching data for their id
//! 2. Reference resolution is bounded and detects cycles
//! 3. Every engine failure is classified at its call site
//! 4. Remote configuration changes are persisted atomically per remote

pub mod cli;
pub mod core;
pub mod git;
pub mod ui;
