//! git::walk
//!
//! Cancellable history traversal.

use tracing::debug;

use super::error::{classify, GitError, Op};
use super::repository::{from_git2_oid, to_git2_oid, Repository};
use crate::core::cancel::CancellationToken;
use crate::core::object::Commit;
use crate::core::types::ObjectId;

/// How a history walk proceeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Follow only the first parent of merges.
    pub first_parent: bool,
    /// Stop after this many commits.
    pub limit: Option<usize>,
    /// Commits whose ancestry is excluded (as in `start ^hidden`).
    pub hide: Vec<ObjectId>,
}

/// Iterator over commits, newest first in topological order.
///
/// Yields `Err(GitError::Cancelled)` once if the token is cancelled, then ends.
pub struct CommitWalk<'r> {
    repo: &'r Repository,
    revwalk: git2::Revwalk<'r>,
    remaining: Option<usize>,
    cancel: CancellationToken,
    done: bool,
}

impl<'r> CommitWalk<'r> {
    pub(super) fn new(
        repo: &'r Repository,
        start: &ObjectId,
        options: WalkOptions,
        cancel: CancellationToken,
    ) -> Result<Self, GitError> {
        let walk_err = |e| classify(e, "git_revwalk", Op::Object(start));

        let mut revwalk = repo.raw().revwalk().map_err(walk_err)?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(walk_err)?;
        revwalk.push(to_git2_oid(start)?).map_err(walk_err)?;
        for hidden in &options.hide {
            revwalk
                .hide(to_git2_oid(hidden)?)
                .map_err(|e| classify(e, "git_revwalk_hide", Op::Object(hidden)))?;
        }
        if options.first_parent {
            revwalk.simplify_first_parent().map_err(walk_err)?;
        }

        Ok(Self {
            repo,
            revwalk,
            remaining: options.limit,
            cancel,
            done: false,
        })
    }
}

impl Iterator for CommitWalk<'_> {
    type Item = Result<Commit, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cancel.is_cancelled() {
            debug!("history walk cancelled");
            self.done = true;
            return Some(Err(GitError::Cancelled));
        }
        if self.remaining == Some(0) {
            self.done = true;
            return None;
        }

        let oid = match self.revwalk.next()? {
            Ok(oid) => oid,
            Err(e) => {
                self.done = true;
                return Some(Err(classify(e, "git_revwalk_next", Op::Other)));
            }
        };
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }

        let commit = from_git2_oid(oid).and_then(|id| self.repo.lookup_commit(&id));
        if commit.is_err() {
            self.done = true;
        }
        Some(commit)
    }
}
