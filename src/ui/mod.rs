//! ui
//!
//! Terminal output for the `gitmodel` binary.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All output goes through this module so quiet and JSON modes are
//! handled in one place. The library itself never prints.

pub mod output;
