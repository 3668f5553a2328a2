//! git::shared
//!
//! A repository handle shared between threads.

use std::sync::{Arc, Mutex, PoisonError};

use super::repository::Repository;

/// A [`Repository`] behind a mutex.
///
/// Every operation runs inside [`SharedRepository::with`], one at a time.
/// Clones share the same handle.
///
/// # Example
///
/// ```no_run
/// use gitmodel::git::{Repository, SharedRepository};
/// use std::path::Path;
///
/// let shared = SharedRepository::new(Repository::open(Path::new("."))?);
/// let worker = shared.clone();
/// let head = std::thread::spawn(move || worker.with(|repo| repo.head_id()))
///     .join()
///     .unwrap()?;
/// # Ok::<(), gitmodel::git::GitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedRepository {
    inner: Arc<Mutex<Repository>>,
}

impl SharedRepository {
    pub fn new(repo: Repository) -> Self {
        Self {
            inner: Arc::new(Mutex::new(repo)),
        }
    }

    /// Run `f` with exclusive access to the repository.
    ///
    /// A panic inside an earlier critical section does not poison later ones.
    pub fn with<T>(&self, f: impl FnOnce(&mut Repository) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl From<Repository> for SharedRepository {
    fn from(repo: Repository) -> Self {
        Self::new(repo)
    }
}
