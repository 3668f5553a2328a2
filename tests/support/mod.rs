//! Shared fixtures for integration tests.
//!
//! Repositories are built with `git2` directly so every object id is
//! deterministic: fixed signatures, fixed timestamps, fixed initial branch.

#![allow(dead_code)]

use std::path::Path;

use tempfile::TempDir;

use gitmodel::core::types::ObjectId;
use gitmodel::git::Repository;

/// Regular file mode.
pub const FILE: i32 = 0o100644;
/// Subdirectory mode.
pub const DIR: i32 = 0o040000;

/// Test fixture that creates a real git repository.
pub struct TestRepo {
    dir: TempDir,
    raw: git2::Repository,
}

impl TestRepo {
    /// Create an empty repository whose `HEAD` points at `refs/heads/main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut opts = git2::RepositoryInitOptions::new();
        opts.initial_head("main");
        let raw = git2::Repository::init_opts(dir.path(), &opts).expect("failed to init repo");
        Self { dir, raw }
    }

    /// Create a repository with one commit on `main` holding `README.md`.
    pub fn with_initial_commit() -> (Self, ObjectId) {
        let repo = Self::new();
        let id = repo.commit_files("refs/heads/main", &[("README.md", b"# Test Repo\n")], "Initial commit");
        (repo, id)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git_dir(&self) -> &Path {
        self.raw.path()
    }

    /// Open the repository under test.
    pub fn open(&self) -> Repository {
        Repository::open(self.path()).expect("failed to open test repo")
    }

    pub fn raw(&self) -> &git2::Repository {
        &self.raw
    }

    /// A fixed signature at 2023-11-14T22:13:20+01:00.
    pub fn signature() -> git2::Signature<'static> {
        let time = git2::Time::new(1_700_000_000, 60);
        git2::Signature::new("Test User", "test@example.com", &time).unwrap()
    }

    pub fn blob(&self, content: &[u8]) -> git2::Oid {
        self.raw.blob(content).unwrap()
    }

    /// Write a tree from `(name, id, mode)` entries.
    pub fn tree(&self, entries: &[(&str, git2::Oid, i32)]) -> git2::Oid {
        let mut builder = self.raw.treebuilder(None).unwrap();
        for (name, oid, mode) in entries {
            builder.insert(name, *oid, *mode).unwrap();
        }
        builder.write().unwrap()
    }

    /// Write a commit, optionally moving `update_ref` to it.
    pub fn commit(
        &self,
        update_ref: Option<&str>,
        tree: git2::Oid,
        parents: &[git2::Oid],
        message: &str,
    ) -> ObjectId {
        let sig = Self::signature();
        let tree = self.raw.find_tree(tree).unwrap();
        let parents: Vec<_> = parents
            .iter()
            .map(|oid| self.raw.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        let oid = self
            .raw
            .commit(update_ref, &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
        id(oid)
    }

    /// Commit a flat tree of files on top of `refname`'s current commit.
    pub fn commit_files(&self, refname: &str, files: &[(&str, &[u8])], message: &str) -> ObjectId {
        let entries: Vec<_> = files
            .iter()
            .map(|(name, content)| (*name, self.blob(content), FILE))
            .collect();
        let tree = self.tree(&entries);
        let parents: Vec<_> = self
            .raw
            .refname_to_id(refname)
            .map(|oid| vec![oid])
            .unwrap_or_default();
        self.commit(Some(refname), tree, &parents, message)
    }

    /// Create an annotated tag and return the tag object's id.
    pub fn annotated_tag(&self, name: &str, target: &ObjectId, message: &str) -> ObjectId {
        let object = self.raw.find_object(oid(target), None).unwrap();
        let oid = self
            .raw
            .tag(name, &object, &Self::signature(), message, false)
            .unwrap();
        id(oid)
    }

    pub fn lightweight_tag(&self, name: &str, target: &ObjectId) {
        let object = self.raw.find_object(oid(target), None).unwrap();
        self.raw.tag_lightweight(name, &object, false).unwrap();
    }

    /// Point `name` at `target` by writing the loose reference file directly.
    ///
    /// Bypasses all validation, so chains, cycles and dangling targets can
    /// be set up freely.
    pub fn write_symbolic(&self, name: &str, target: &str) {
        let path = self.git_dir().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, format!("ref: {target}\n")).unwrap();
    }

    /// Write a direct reference.
    pub fn write_direct(&self, name: &str, target: &ObjectId) {
        self.raw.reference(name, oid(target), true, "test").unwrap();
    }
}

pub fn id(oid: git2::Oid) -> ObjectId {
    ObjectId::from_bytes(oid.as_bytes()).unwrap()
}

pub fn oid(id: &ObjectId) -> git2::Oid {
    git2::Oid::from_bytes(id.as_bytes()).unwrap()
}

/// An id that names nothing in any fixture repository.
pub fn missing_id() -> ObjectId {
    ObjectId::from_hex("0123456789abcdef0123456789abcdef01234567").unwrap()
}

/// Build a chain `refs/chain/0 -> refs/chain/1 -> ... -> refs/chain/<hops>`
/// where the last reference points directly at `target`.
///
/// Returns the name of the first reference.
pub fn symbolic_chain(repo: &TestRepo, hops: usize, target: &ObjectId) -> String {
    for i in 0..hops {
        repo.write_symbolic(&format!("refs/chain/{i}"), &format!("refs/chain/{}", i + 1));
    }
    repo.write_direct(&format!("refs/chain/{hops}"), target);
    "refs/chain/0".to_string()
}
