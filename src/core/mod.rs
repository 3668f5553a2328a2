//! core
//!
//! Engine-independent domain types for gitmodel.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ObjectId, RefName
//! - [`object`] - Blob, Tree, Commit, Tag and the closed Object union
//! - [`reference`] - References, branches, tags, bounded resolution
//! - [`remote`] - Remote configuration records
//! - [`cancel`] - Cancellation tokens for long walks
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Values are immutable and fully materialized
//! - Nothing here talks to the engine; see [`crate::git`]

pub mod cancel;
pub mod config;
pub mod object;
pub mod reference;
pub mod remote;
pub mod types;
