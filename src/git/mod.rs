//! git
//!
//! The typed repository layer over libgit2.
//!
//! # Architecture
//!
//! This module is the **only doorway** to the engine. Every object lookup,
//! reference update and remote change flows through [`Repository`]. No
//! other module imports `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Object lookup and materialization into [`crate::core::object`] values
//! - Reference reads, bounded resolution, and updates
//! - Revision parsing and history walks
//! - Remote configuration, with fetch/push handed to a [`Transport`]
//! - Translation of engine failures into [`GitError`]
//!
//! # Example
//!
//! ```no_run
//! use gitmodel::git::Repository;
//! use std::path::Path;
//!
//! let repo = Repository::open(Path::new("."))?;
//!
//! let main = repo.resolve("main")?;
//! let commit = repo.lookup_commit(&main)?;
//! let tree = repo.lookup_tree(commit.tree())?;
//! for entry in &tree {
//!     println!("{} {} {}", entry.mode(), entry.id().short(7), entry.name());
//! }
//! # Ok::<(), gitmodel::git::GitError>(())
//! ```

mod error;
mod repository;
mod shared;
pub mod transport;
mod walk;

pub use error::{translate, EngineError, GitError, ENGINE_DOMAIN, UNKNOWN_ENGINE_ERROR};
pub use repository::{RepoInfo, Repository, RepositoryOptions};
pub use shared::SharedRepository;
pub use transport::{
    Credential, CredentialsProvider, FetchOutcome, NoCredentials, RefUpdate, Transport,
    TransportError,
};
pub use walk::{CommitWalk, WalkOptions};

use crate::core::object::ObjectKind;
use crate::core::types::ObjectId;

/// Compute the id `data` would have as an object of `kind`, without writing it.
///
/// # Example
///
/// ```
/// use gitmodel::core::object::ObjectKind;
/// use gitmodel::git::hash_object;
///
/// let id = hash_object(ObjectKind::Blob, b"hello\n").unwrap();
/// assert_eq!(id.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
/// ```
pub fn hash_object(kind: ObjectKind, data: &[u8]) -> Result<ObjectId, GitError> {
    let oid = git2::Oid::hash_object(repository::kind_to_git2(kind), data)
        .map_err(|e| error::classify(e, "git_odb_hash", error::Op::Other))?;
    repository::from_git2_oid(oid)
}
