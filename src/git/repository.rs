//! git::repository
//!
//! The repository handle and every operation that reads or mutates it.
//!
//! # Handle Ownership
//!
//! [`Repository`] exclusively owns the engine handle and releases it on
//! drop. Values returned from it copy what they need and never borrow the
//! handle, so they outlive the repository freely.
//!
//! # No Caching
//!
//! Every lookup re-queries the engine. A value always reflects on-disk
//! state at the time of the call.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use tracing::{debug, warn};

use super::error::{classify, GitError, Op};
use super::transport::{CredentialsProvider, FetchOutcome, Transport};
use super::walk::{CommitWalk, WalkOptions};
use crate::core::cancel::CancellationToken;
use crate::core::config::Config;
use crate::core::object::{
    Blob, Commit, FileMode, Object, ObjectKind, ObjectRef, RepositoryObject, Signature, Tag, Tree,
    TreeEntry,
};
use crate::core::reference::{
    expand_shorthand, resolve_chain, Branch, BranchKind, Reference, ReferenceTarget, TagReference,
    DEFAULT_MAX_SYMBOLIC_DEPTH, MAX_SYMBOLIC_DEPTH_LIMIT,
};
use crate::core::remote::{validate_remote_name, Remote, RemoteSummary};
use crate::core::types::{HashAlgorithm, ObjectId, RefName};

/// Options controlling how a repository is opened and queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Symbolic hops followed before resolution fails.
    pub max_symbolic_depth: usize,
    /// Search parent directories for the repository.
    pub discover: bool,
    /// Accept repositories without a working directory.
    pub allow_bare: bool,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            max_symbolic_depth: DEFAULT_MAX_SYMBOLIC_DEPTH,
            discover: true,
            allow_bare: true,
        }
    }
}

impl RepositoryOptions {
    /// Options taken from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_symbolic_depth: config.max_symbolic_depth(),
            discover: config.discover(),
            allow_bare: config.allow_bare(),
        }
    }
}

/// Paths of an opened repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Path to the git directory
    pub git_dir: PathBuf,
    /// Path to the working directory, absent for bare repositories
    pub work_dir: Option<PathBuf>,
}

impl RepoInfo {
    pub fn is_bare(&self) -> bool {
        self.work_dir.is_none()
    }
}

/// A Git repository.
///
/// All repository reads and writes flow through this type. No other module
/// touches the engine directly.
///
/// `Repository` is `Send` but not `Sync`. Use one instance per thread, or
/// share one through [`crate::git::SharedRepository`].
///
/// # Example
///
/// ```no_run
/// use gitmodel::git::Repository;
/// use std::path::Path;
///
/// let repo = Repository::open(Path::new("."))?;
///
/// let head = repo.head_id()?;
/// let commit = repo.lookup_commit(&head)?;
/// println!("{} {}", head.short(7), commit.summary());
/// # Ok::<(), gitmodel::git::GitError>(())
/// ```
pub struct Repository {
    repo: git2::Repository,
    options: RepositoryOptions,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.repo.path())
            .field("options", &self.options)
            .finish()
    }
}

impl Repository {
    // =========================================================================
    // Opening and Info
    // =========================================================================

    /// Open a repository with default options.
    ///
    /// `path` may be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        Self::open_with(path, RepositoryOptions::default())
    }

    /// Open a repository with explicit options.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository is bare and bare
    ///   repositories are not allowed
    pub fn open_with(path: &Path, options: RepositoryOptions) -> Result<Self, GitError> {
        let opened = if options.discover {
            git2::Repository::discover(path)
        } else {
            git2::Repository::open(path)
        };
        let repo = opened.map_err(|e| classify(e, "git_repository_open", Op::Open(path)))?;

        if repo.is_bare() && !options.allow_bare {
            return Err(GitError::BareRepo {
                path: repo.path().to_path_buf(),
            });
        }

        debug!(git_dir = %repo.path().display(), "opened repository");
        Ok(Self { repo, options })
    }

    /// Create a new, empty repository at `path`.
    pub fn init(path: &Path, bare: bool) -> Result<Self, GitError> {
        let created = if bare {
            git2::Repository::init_bare(path)
        } else {
            git2::Repository::init(path)
        };
        let repo = created.map_err(|e| classify(e, "git_repository_init", Op::Other))?;
        debug!(git_dir = %repo.path().display(), bare, "initialized repository");
        Ok(Self {
            repo,
            options: RepositoryOptions::default(),
        })
    }

    pub fn info(&self) -> RepoInfo {
        RepoInfo {
            git_dir: self.repo.path().to_path_buf(),
            work_dir: self.repo.workdir().map(Path::to_path_buf),
        }
    }

    /// Path to the git directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Change the symbolic depth limit for subsequent resolutions.
    ///
    /// Values above [`MAX_SYMBOLIC_DEPTH_LIMIT`] are capped.
    pub fn set_max_symbolic_depth(&mut self, depth: usize) {
        self.options.max_symbolic_depth = depth.min(MAX_SYMBOLIC_DEPTH_LIMIT);
    }

    pub(super) fn raw(&self) -> &git2::Repository {
        &self.repo
    }

    // =========================================================================
    // Object Lookup
    // =========================================================================

    /// Look up any object by id.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if no object has this id
    /// - [`GitError::CorruptObject`] if the engine cannot parse it
    pub fn lookup_object(&self, id: &ObjectId) -> Result<Object, GitError> {
        let oid = to_git2_oid(id)?;
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| classify(e, "git_object_lookup", Op::Object(id)))?;
        materialize(id, &object)
    }

    /// Look up an object and require it to be of type `T`.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectTypeMismatch`] if the object is of another kind
    /// - Any error of [`Repository::lookup_object`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitmodel::core::object::Tree;
    /// # use gitmodel::git::Repository;
    /// # fn f(repo: &Repository, id: &gitmodel::core::types::ObjectId) -> Result<(), gitmodel::git::GitError> {
    /// let tree: Tree = repo.lookup(id)?;
    /// for entry in &tree {
    ///     println!("{} {}", entry.mode(), entry.name());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup<T: RepositoryObject>(&self, id: &ObjectId) -> Result<T, GitError> {
        let object = self.lookup_object(id)?;
        T::from_object(object).map_err(|other| GitError::ObjectTypeMismatch {
            id: *id,
            expected: T::KIND,
            actual: other.kind(),
        })
    }

    pub fn lookup_commit(&self, id: &ObjectId) -> Result<Commit, GitError> {
        self.lookup(id)
    }

    pub fn lookup_tree(&self, id: &ObjectId) -> Result<Tree, GitError> {
        self.lookup(id)
    }

    pub fn lookup_blob(&self, id: &ObjectId) -> Result<Blob, GitError> {
        self.lookup(id)
    }

    pub fn lookup_tag(&self, id: &ObjectId) -> Result<Tag, GitError> {
        self.lookup(id)
    }

    /// Load the object a tree entry or tag points at, checking its kind.
    pub fn lookup_ref(&self, target: ObjectRef) -> Result<Object, GitError> {
        let object = self.lookup_object(&target.id)?;
        if object.kind() != target.kind {
            return Err(GitError::ObjectTypeMismatch {
                id: target.id,
                expected: target.kind,
                actual: object.kind(),
            });
        }
        Ok(object)
    }

    /// Follow annotated tags from `id` until an object of `kind` is reached.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectTypeMismatch`] if the chain ends at another kind
    pub fn peel(&self, id: &ObjectId, kind: ObjectKind) -> Result<Object, GitError> {
        let mut object = self.lookup_object(id)?;
        loop {
            if object.kind() == kind {
                return Ok(object);
            }
            match object {
                Object::Tag(tag) => object = self.lookup_object(&tag.target().id)?,
                other => {
                    return Err(GitError::ObjectTypeMismatch {
                        id: *id,
                        expected: kind,
                        actual: other.kind(),
                    })
                }
            }
        }
    }

    /// Kind and size of an object, read without loading its content.
    pub fn object_header(&self, id: &ObjectId) -> Result<(ObjectKind, usize), GitError> {
        let oid = to_git2_oid(id)?;
        let odb = self
            .repo
            .odb()
            .map_err(|e| classify(e, "git_repository_odb", Op::Other))?;
        let (size, kind) = odb
            .read_header(oid)
            .map_err(|e| classify(e, "git_odb_read_header", Op::Object(id)))?;
        let kind = kind_from_git2(kind).ok_or_else(|| GitError::CorruptObject {
            id: *id,
            message: format!("unexpected object type {kind:?}"),
            engine: None,
        })?;
        Ok((kind, size))
    }

    /// Whether an object with this id exists.
    pub fn contains(&self, id: &ObjectId) -> Result<bool, GitError> {
        let oid = to_git2_oid(id)?;
        let odb = self
            .repo
            .odb()
            .map_err(|e| classify(e, "git_repository_odb", Op::Other))?;
        Ok(odb.exists(oid))
    }

    /// Write `content` as a blob and return its id.
    pub fn write_blob(&self, content: &[u8]) -> Result<ObjectId, GitError> {
        let oid = self
            .repo
            .blob(content)
            .map_err(|e| classify(e, "git_blob_create", Op::Other))?;
        from_git2_oid(oid)
    }

    // =========================================================================
    // References
    // =========================================================================

    /// Find a reference by its full name, without resolving it.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidFormat`] if `name` is not a valid reference name
    /// - [`GitError::ReferenceNotFound`] if it does not exist
    pub fn find_reference(&self, name: &str) -> Result<Reference, GitError> {
        let name = RefName::new(name)?;
        self.try_find_reference(&name)?
            .ok_or_else(|| GitError::ReferenceNotFound {
                name: name.into(),
                engine: None,
            })
    }

    fn try_find_reference(&self, name: &RefName) -> Result<Option<Reference>, GitError> {
        match self.repo.find_reference(name.as_str()) {
            Ok(reference) => Ok(Some(Reference::new(name.clone(), target_of(&reference)?))),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(classify(e, "git_reference_lookup", Op::Reference(name.as_str()))),
        }
    }

    /// Resolve a reference to the object id it ultimately names.
    ///
    /// Symbolic hops are bounded by the configured depth.
    ///
    /// # Errors
    ///
    /// - [`GitError::ReferenceCycle`] if the chain revisits a name
    /// - [`GitError::MaxDepthExceeded`] if the chain is too long
    /// - [`GitError::ReferenceNotFound`] if a symbolic target is missing
    pub fn resolve_reference(&self, reference: &Reference) -> Result<ObjectId, GitError> {
        match reference.target() {
            ReferenceTarget::Direct(id) => Ok(*id),
            ReferenceTarget::Symbolic(_) => resolve_chain(
                reference.name(),
                self.options.max_symbolic_depth,
                |name: &RefName| Ok::<_, GitError>(self.try_find_reference(name)?.map(|r| r.target().clone())),
            ),
        }
    }

    /// Resolve a possibly abbreviated reference name.
    ///
    /// Tries `name`, `refs/<name>`, `refs/tags/<name>`, `refs/heads/<name>`,
    /// `refs/remotes/<name>` and `refs/remotes/<name>/HEAD`, in that order.
    pub fn resolve(&self, name: &str) -> Result<ObjectId, GitError> {
        for candidate in expand_shorthand(name) {
            if !git2::Reference::is_valid_name(&candidate) {
                continue;
            }
            let Ok(candidate) = RefName::new(candidate) else {
                continue;
            };
            if let Some(reference) = self.try_find_reference(&candidate)? {
                debug!(name, reference = %reference.name(), "resolved shorthand");
                return self.resolve_reference(&reference);
            }
        }
        Err(GitError::ReferenceNotFound {
            name: name.to_string(),
            engine: None,
        })
    }

    /// Create a direct reference.
    ///
    /// # Errors
    ///
    /// - [`GitError::ReferenceExists`] if `name` exists and `force` is false
    /// - [`GitError::ObjectNotFound`] if `target` is not in the repository
    pub fn create_reference(
        &self,
        name: &str,
        target: &ObjectId,
        force: bool,
        log_message: &str,
    ) -> Result<Reference, GitError> {
        let name = RefName::new(name)?;
        if !self.contains(target)? {
            return Err(GitError::ObjectNotFound {
                id: *target,
                engine: None,
            });
        }

        let oid = to_git2_oid(target)?;
        self.repo
            .reference(name.as_str(), oid, force, log_message)
            .map_err(|e| classify(e, "git_reference_create", Op::ReferenceWrite(name.as_str())))?;

        debug!(reference = %name, oid = %target, force, "created reference");
        Ok(Reference::new(name, ReferenceTarget::Direct(*target)))
    }

    /// Create a symbolic reference. The target need not exist yet.
    pub fn create_symbolic_reference(
        &self,
        name: &str,
        target: &str,
        force: bool,
        log_message: &str,
    ) -> Result<Reference, GitError> {
        let name = RefName::new(name)?;
        let target = RefName::new(target)?;

        self.repo
            .reference_symbolic(name.as_str(), target.as_str(), force, log_message)
            .map_err(|e| {
                classify(e, "git_reference_symbolic_create", Op::ReferenceWrite(name.as_str()))
            })?;

        debug!(reference = %name, points_to = %target, force, "created symbolic reference");
        Ok(Reference::new(name, ReferenceTarget::Symbolic(target)))
    }

    /// Rename a reference, keeping its target.
    pub fn rename_reference(
        &self,
        old: &str,
        new: &str,
        force: bool,
    ) -> Result<Reference, GitError> {
        let old = RefName::new(old)?;
        let new = RefName::new(new)?;

        let mut reference = self
            .repo
            .find_reference(old.as_str())
            .map_err(|e| classify(e, "git_reference_lookup", Op::Reference(old.as_str())))?;
        let message = format!("rename: {old} -> {new}");
        let renamed = reference
            .rename(new.as_str(), force, &message)
            .map_err(|e| classify(e, "git_reference_rename", Op::ReferenceWrite(new.as_str())))?;

        debug!(from = %old, to = %new, "renamed reference");
        Ok(Reference::new(new, target_of(&renamed)?))
    }

    pub fn delete_reference(&self, name: &str) -> Result<(), GitError> {
        let name = RefName::new(name)?;
        let mut reference = self
            .repo
            .find_reference(name.as_str())
            .map_err(|e| classify(e, "git_reference_lookup", Op::Reference(name.as_str())))?;
        reference
            .delete()
            .map_err(|e| classify(e, "git_reference_delete", Op::ReferenceWrite(name.as_str())))?;

        debug!(reference = %name, "deleted reference");
        Ok(())
    }

    /// All references, or those whose name starts with `prefix`, sorted by name.
    ///
    /// The prefix is matched literally. References with names that are not
    /// valid UTF-8 are skipped.
    pub fn references(&self, prefix: Option<&str>) -> Result<Vec<Reference>, GitError> {
        let iter = self
            .repo
            .references()
            .map_err(|e| classify(e, "git_reference_iterator_new", Op::Other))?;

        let mut references = Vec::new();
        for reference in iter {
            let reference =
                reference.map_err(|e| classify(e, "git_reference_next", Op::Other))?;
            let Some(name) = reference.name() else {
                continue;
            };
            if prefix.is_some_and(|prefix| !name.starts_with(prefix)) {
                continue;
            }
            let name = match RefName::new(name) {
                Ok(name) => name,
                Err(err) => {
                    warn!(%err, "skipping reference with invalid name");
                    continue;
                }
            };
            references.push(Reference::new(name, target_of(&reference)?));
        }

        references.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(references)
    }

    /// The `HEAD` reference, unresolved.
    pub fn head(&self) -> Result<Reference, GitError> {
        self.find_reference("HEAD")
    }

    /// The id `HEAD` resolves to.
    ///
    /// # Errors
    ///
    /// - [`GitError::ReferenceNotFound`] if `HEAD` names an unborn branch
    pub fn head_id(&self) -> Result<ObjectId, GitError> {
        self.resolve_reference(&self.head()?)
    }

    /// Point `HEAD` at a reference.
    pub fn set_head(&self, name: &str) -> Result<(), GitError> {
        let name = RefName::new(name)?;
        self.repo
            .set_head(name.as_str())
            .map_err(|e| classify(e, "git_repository_set_head", Op::ReferenceWrite("HEAD")))?;
        debug!(reference = %name, "set HEAD");
        Ok(())
    }

    /// Detach `HEAD` at a commit.
    pub fn set_head_detached(&self, id: &ObjectId) -> Result<(), GitError> {
        let oid = to_git2_oid(id)?;
        self.repo
            .set_head_detached(oid)
            .map_err(|e| classify(e, "git_repository_set_head_detached", Op::Object(id)))?;
        debug!(oid = %id, "detached HEAD");
        Ok(())
    }

    // =========================================================================
    // Branches and Tags
    // =========================================================================

    pub fn local_branches(&self) -> Result<Vec<Branch>, GitError> {
        self.branches(BranchKind::Local)
    }

    /// Remote-tracking branches. Symbolic entries such as `origin/HEAD` are skipped.
    pub fn remote_branches(&self) -> Result<Vec<Branch>, GitError> {
        self.branches(BranchKind::Remote)
    }

    fn branches(&self, kind: BranchKind) -> Result<Vec<Branch>, GitError> {
        let mut branches = Vec::new();
        for reference in self.references(Some(kind.namespace()))? {
            if reference.is_symbolic() {
                continue;
            }
            let commit = self.resolve_reference(&reference)?;
            branches.push(Branch::new(reference.name().clone(), kind, commit));
        }
        Ok(branches)
    }

    /// Find a branch by short name (`main`, or `origin/main` for remote branches).
    pub fn branch(&self, name: &str, kind: BranchKind) -> Result<Branch, GitError> {
        let reference = self.find_reference(&format!("{}{name}", kind.namespace()))?;
        let commit = self.resolve_reference(&reference)?;
        Ok(Branch::new(reference.name().clone(), kind, commit))
    }

    /// All tags, sorted by name.
    pub fn tags(&self) -> Result<Vec<TagReference>, GitError> {
        self.references(Some(RefName::TAGS))?
            .iter()
            .map(|reference| self.tag_from_reference(reference))
            .collect()
    }

    /// Find a tag by short name.
    pub fn tag(&self, name: &str) -> Result<TagReference, GitError> {
        let refname = RefName::for_tag(name)?;
        let reference = self.find_reference(refname.as_str())?;
        self.tag_from_reference(&reference)
    }

    fn tag_from_reference(&self, reference: &Reference) -> Result<TagReference, GitError> {
        let id = self.resolve_reference(reference)?;
        let (kind, _) = self.object_header(&id)?;
        let name = reference.name().clone();
        if kind == ObjectKind::Tag {
            let tag = self.lookup_tag(&id)?;
            Ok(TagReference::Annotated { name, tag })
        } else {
            Ok(TagReference::Lightweight {
                name,
                target: ObjectRef::new(id, kind),
            })
        }
    }

    // =========================================================================
    // Revisions and History
    // =========================================================================

    /// Resolve a revision expression (`HEAD~2`, `v1.0^{tree}`, `main:src`, ...).
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if the expression names nothing
    /// - [`GitError::InvalidRevisionSyntax`] if it is malformed or ambiguous
    pub fn resolve_revision(&self, spec: &str) -> Result<ObjectId, GitError> {
        let object = self
            .repo
            .revparse_single(spec)
            .map_err(|e| classify(e, "git_revparse_single", Op::Revision(spec)))?;
        from_git2_oid(object.id())
    }

    /// Walk history from a commit, newest first.
    ///
    /// The walk checks `cancel` before each commit and stops with
    /// [`GitError::Cancelled`] once it is set.
    pub fn walk(
        &self,
        start: &ObjectId,
        options: WalkOptions,
        cancel: &CancellationToken,
    ) -> Result<CommitWalk<'_>, GitError> {
        self.lookup_commit(start)?;
        CommitWalk::new(self, start, options, cancel.clone())
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    /// Find a remote by name.
    ///
    /// # Errors
    ///
    /// - [`GitError::RemoteNotFound`] if no remote has this name
    pub fn find_remote(&self, name: &str) -> Result<Remote, GitError> {
        let remote = self
            .repo
            .find_remote(name)
            .map_err(|e| classify(e, "git_remote_lookup", Op::Remote(name)))?;

        let fetch_refspecs = remote
            .fetch_refspecs()
            .map_err(|e| classify(e, "git_remote_get_fetch_refspecs", Op::Remote(name)))?;
        let push_refspecs = remote
            .push_refspecs()
            .map_err(|e| classify(e, "git_remote_get_push_refspecs", Op::Remote(name)))?;

        Ok(Remote::new(
            name.to_string(),
            String::from_utf8_lossy(remote.url_bytes()).into_owned(),
            remote
                .pushurl_bytes()
                .map(|url| String::from_utf8_lossy(url).into_owned()),
            fetch_refspecs.iter().flatten().map(String::from).collect(),
            push_refspecs.iter().flatten().map(String::from).collect(),
        ))
    }

    /// Names of all configured remotes, sorted.
    pub fn remote_names(&self) -> Result<Vec<String>, GitError> {
        let names = self
            .repo
            .remotes()
            .map_err(|e| classify(e, "git_remote_list", Op::Other))?;
        let mut names: Vec<String> = names.iter().flatten().map(String::from).collect();
        names.sort();
        Ok(names)
    }

    /// Name and URL of every remote, sorted by name.
    pub fn remotes(&self) -> Result<Vec<RemoteSummary>, GitError> {
        self.remote_names()?
            .iter()
            .map(|name| self.find_remote(name).map(|remote| remote.summary()))
            .collect()
    }

    /// Add a remote with the default fetch refspec.
    ///
    /// The configuration is persisted immediately. On failure it is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidFormat`] if `name` is not a valid remote name
    /// - [`GitError::RemoteExists`] if a remote with this name exists
    pub fn create_remote(&self, name: &str, url: &str) -> Result<Remote, GitError> {
        validate_remote_name(name)?;
        self.repo
            .remote(name, url)
            .map_err(|e| classify(e, "git_remote_create", Op::Remote(name)))?;
        debug!(remote = name, url, "created remote");
        self.find_remote(name)
    }

    /// Remove a remote and its remote-tracking branches.
    pub fn delete_remote(&self, name: &str) -> Result<(), GitError> {
        self.find_remote(name)?;
        self.repo
            .remote_delete(name)
            .map_err(|e| classify(e, "git_remote_delete", Op::Remote(name)))?;
        debug!(remote = name, "deleted remote");
        Ok(())
    }

    pub fn set_remote_url(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.find_remote(name)?;
        self.repo
            .remote_set_url(name, url)
            .map_err(|e| classify(e, "git_remote_set_url", Op::Remote(name)))?;
        debug!(remote = name, url, "set remote url");
        Ok(())
    }

    /// Set or clear the push URL.
    pub fn set_remote_push_url(&self, name: &str, url: Option<&str>) -> Result<(), GitError> {
        self.find_remote(name)?;
        self.repo
            .remote_set_pushurl(name, url)
            .map_err(|e| classify(e, "git_remote_set_pushurl", Op::Remote(name)))?;
        debug!(remote = name, ?url, "set remote push url");
        Ok(())
    }

    /// Rename a remote.
    ///
    /// Returns the fetch refspecs that could not be rewritten and were left
    /// as they were.
    pub fn rename_remote(&self, old: &str, new: &str) -> Result<Vec<String>, GitError> {
        validate_remote_name(new)?;
        self.find_remote(old)?;
        let problems = self
            .repo
            .remote_rename(old, new)
            .map_err(|e| classify(e, "git_remote_rename", Op::Remote(new)))?;
        let problems: Vec<String> = problems.iter().flatten().map(String::from).collect();
        if !problems.is_empty() {
            warn!(remote = new, ?problems, "refspecs left unchanged by rename");
        }
        debug!(from = old, to = new, "renamed remote");
        Ok(problems)
    }

    /// Fetch from a remote through an external transport.
    ///
    /// The transport stores the transferred objects; this method then moves
    /// the remote-tracking references it reports. Every reported target is
    /// checked before any reference moves, so a bad report leaves the
    /// references untouched.
    ///
    /// # Errors
    ///
    /// - [`GitError::RemoteNotFound`] if no remote has this name
    /// - [`GitError::Transport`] if the transport fails
    /// - [`GitError::ObjectNotFound`] if a reported target was not stored
    pub fn fetch(
        &self,
        name: &str,
        transport: &dyn Transport,
        credentials: &dyn CredentialsProvider,
    ) -> Result<FetchOutcome, GitError> {
        let remote = self.find_remote(name)?;
        debug!(remote = name, url = remote.url(), "fetching");

        let outcome = transport
            .fetch(&remote, credentials)
            .map_err(|e| GitError::Transport {
                remote: name.to_string(),
                message: e.to_string(),
            })?;

        for update in &outcome.updates {
            if !self.contains(&update.target)? {
                warn!(
                    remote = name,
                    reference = %update.name,
                    oid = %update.target,
                    "fetched target missing"
                );
                return Err(GitError::ObjectNotFound {
                    id: update.target,
                    engine: None,
                });
            }
        }

        let log_message = format!("fetch: {name}");
        for update in &outcome.updates {
            self.create_reference(update.name.as_str(), &update.target, true, &log_message)?;
        }

        debug!(remote = name, updated = outcome.updates.len(), "fetch complete");
        Ok(outcome)
    }

    /// Push refspecs to a remote through an external transport.
    pub fn push(
        &self,
        name: &str,
        refspecs: &[String],
        transport: &dyn Transport,
        credentials: &dyn CredentialsProvider,
    ) -> Result<(), GitError> {
        let remote = self.find_remote(name)?;
        debug!(remote = name, url = remote.effective_push_url(), ?refspecs, "pushing");
        transport
            .push(&remote, refspecs, credentials)
            .map_err(|e| GitError::Transport {
                remote: name.to_string(),
                message: e.to_string(),
            })
    }
}

// =============================================================================
// Engine conversions
// =============================================================================

pub(super) fn to_git2_oid(id: &ObjectId) -> Result<git2::Oid, GitError> {
    if id.algorithm() != HashAlgorithm::Sha1 {
        return Err(GitError::invalid_format(format!(
            "object format {:?} is not supported by this repository",
            id.algorithm()
        )));
    }
    git2::Oid::from_bytes(id.as_bytes()).map_err(|e| classify(e, "git_oid_fromraw", Op::Other))
}

pub(super) fn from_git2_oid(oid: git2::Oid) -> Result<ObjectId, GitError> {
    Ok(ObjectId::from_bytes(oid.as_bytes())?)
}

pub(super) fn kind_from_git2(kind: git2::ObjectType) -> Option<ObjectKind> {
    match kind {
        git2::ObjectType::Commit => Some(ObjectKind::Commit),
        git2::ObjectType::Tree => Some(ObjectKind::Tree),
        git2::ObjectType::Blob => Some(ObjectKind::Blob),
        git2::ObjectType::Tag => Some(ObjectKind::Tag),
        git2::ObjectType::Any => None,
    }
}

pub(super) fn kind_to_git2(kind: ObjectKind) -> git2::ObjectType {
    match kind {
        ObjectKind::Commit => git2::ObjectType::Commit,
        ObjectKind::Tree => git2::ObjectType::Tree,
        ObjectKind::Blob => git2::ObjectType::Blob,
        ObjectKind::Tag => git2::ObjectType::Tag,
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn signature(sig: &git2::Signature<'_>) -> Signature {
    let when = sig.when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    let time = DateTime::from_timestamp(when.seconds(), 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&offset);
    Signature::new(lossy(sig.name_bytes()), lossy(sig.email_bytes()), time)
}

fn target_of(reference: &git2::Reference<'_>) -> Result<ReferenceTarget, GitError> {
    let invalid = |what: &str| {
        GitError::invalid_format(format!(
            "reference {} has no {what}",
            reference.name().unwrap_or("<non-utf8>")
        ))
    };
    match reference.kind() {
        Some(git2::ReferenceType::Symbolic) => {
            let target = reference
                .symbolic_target()
                .ok_or_else(|| invalid("symbolic target"))?;
            Ok(ReferenceTarget::Symbolic(RefName::new(target)?))
        }
        _ => {
            let oid = reference.target().ok_or_else(|| invalid("target"))?;
            Ok(ReferenceTarget::Direct(from_git2_oid(oid)?))
        }
    }
}

/// Copy an engine object into an owned value.
fn materialize(id: &ObjectId, object: &git2::Object<'_>) -> Result<Object, GitError> {
    let corrupt = |message: String| GitError::CorruptObject {
        id: *id,
        message,
        engine: None,
    };

    if let Some(blob) = object.as_blob() {
        return Ok(Object::Blob(Blob::new(
            *id,
            blob.content().to_vec(),
            blob.is_binary(),
        )));
    }

    if let Some(tree) = object.as_tree() {
        let mut entries = Vec::with_capacity(tree.len());
        for entry in tree.iter() {
            let mode = FileMode::from_raw(entry.filemode()).map_err(|e| corrupt(e.to_string()))?;
            let kind = entry
                .kind()
                .and_then(kind_from_git2)
                .unwrap_or_else(|| mode.object_kind());
            entries.push(TreeEntry::new(
                entry.name_bytes().to_vec(),
                mode,
                ObjectRef::new(from_git2_oid(entry.id())?, kind),
            ));
        }
        return Ok(Object::Tree(Tree::new(*id, entries)));
    }

    if let Some(commit) = object.as_commit() {
        let parents = commit
            .parent_ids()
            .map(from_git2_oid)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Object::Commit(Commit::new(
            *id,
            from_git2_oid(commit.tree_id())?,
            parents,
            signature(&commit.author()),
            signature(&commit.committer()),
            lossy(commit.message_bytes()),
        )));
    }

    if let Some(tag) = object.as_tag() {
        let kind = tag
            .target_type()
            .and_then(kind_from_git2)
            .ok_or_else(|| corrupt("tag target has unknown type".into()))?;
        return Ok(Object::Tag(Tag::new(
            *id,
            lossy(tag.name_bytes()),
            ObjectRef::new(from_git2_oid(tag.target_id())?, kind),
            tag.tagger().as_ref().map(signature),
            tag.message_bytes().map(lossy).unwrap_or_default(),
        )));
    }

    Err(corrupt(format!("unexpected object type {:?}", object.kind())))
}
