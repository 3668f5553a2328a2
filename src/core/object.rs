//! core::object
//!
//! Immutable value types for the four Git object kinds.
//!
//! # Types
//!
//! - [`Blob`] - File content
//! - [`Tree`] / [`TreeEntry`] - Directory listing
//! - [`Commit`] - Revision snapshot
//! - [`Tag`] - Annotated label
//! - [`Object`] - Closed union over the four kinds
//!
//! # Construction
//!
//! Values are only produced by [`crate::git::Repository`] lookups, so an
//! object can exist only if the engine returned matching data for its id.
//! Every value is fully materialized at construction and holds no handle
//! back into the repository.
//!
//! # Identity
//!
//! Equality and hashing for all four kinds are defined by [`ObjectId`] alone.
//! Children (tree entries, commit parents, tag targets) are referenced by id,
//! never owned.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Offset};
use serde::{Deserialize, Serialize};

use super::types::{ObjectId, TypeError};

/// The kind of a repository object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectKind {
    /// The name Git uses for this kind (`commit`, `tree`, `blob`, `tag`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
            ObjectKind::Tag => "tag",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(ObjectKind::Commit),
            "tree" => Ok(ObjectKind::Tree),
            "blob" => Ok(ObjectKind::Blob),
            "tag" => Ok(ObjectKind::Tag),
            other => Err(TypeError::InvalidObjectKind(other.to_string())),
        }
    }
}

/// An object id paired with the kind of object it names.
///
/// Used wherever an object refers to another without loading it: tree
/// entries and tag targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

impl ObjectRef {
    pub fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self { id, kind }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// File mode of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    /// Subdirectory (`040000`)
    Tree,
    /// Regular file (`100644`)
    Blob,
    /// Group-writable regular file (`100664`), found in old repositories
    BlobGroupWritable,
    /// Executable file (`100755`)
    BlobExecutable,
    /// Symbolic link (`120000`)
    Link,
    /// Submodule commit (`160000`)
    Commit,
}

impl FileMode {
    /// Parse the numeric mode stored in a tree.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidFileMode` for modes Git never writes.
    pub fn from_raw(mode: i32) -> Result<Self, TypeError> {
        match mode {
            0o040000 => Ok(FileMode::Tree),
            0o100644 => Ok(FileMode::Blob),
            0o100664 => Ok(FileMode::BlobGroupWritable),
            0o100755 => Ok(FileMode::BlobExecutable),
            0o120000 => Ok(FileMode::Link),
            0o160000 => Ok(FileMode::Commit),
            other => Err(TypeError::InvalidFileMode(other)),
        }
    }

    /// The numeric mode as stored in a tree.
    pub fn raw(&self) -> i32 {
        match self {
            FileMode::Tree => 0o040000,
            FileMode::Blob => 0o100644,
            FileMode::BlobGroupWritable => 0o100664,
            FileMode::BlobExecutable => 0o100755,
            FileMode::Link => 0o120000,
            FileMode::Commit => 0o160000,
        }
    }

    /// The kind of object an entry with this mode points at.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            FileMode::Tree => ObjectKind::Tree,
            FileMode::Commit => ObjectKind::Commit,
            FileMode::Blob
            | FileMode::BlobGroupWritable
            | FileMode::BlobExecutable
            | FileMode::Link => ObjectKind::Blob,
        }
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.raw())
    }
}

/// An author, committer, or tagger identity with a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    name: String,
    email: String,
    when: DateTime<FixedOffset>,
}

impl Signature {
    pub(crate) fn new(name: String, email: String, when: DateTime<FixedOffset>) -> Self {
        Self { name, email, when }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Timestamp in the signer's own timezone.
    pub fn when(&self) -> &DateTime<FixedOffset> {
        &self.when
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.when.timestamp()
    }

    /// Timezone offset from UTC, in minutes.
    pub fn offset_minutes(&self) -> i32 {
        self.when.offset().fix().local_minus_utc() / 60
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// File content.
#[derive(Debug, Clone)]
pub struct Blob {
    id: ObjectId,
    content: Vec<u8>,
    binary: bool,
}

impl Blob {
    pub(crate) fn new(id: ObjectId, content: Vec<u8>, binary: bool) -> Self {
        Self {
            id,
            content,
            binary,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Whether the engine's heuristics consider this content binary.
    pub fn is_binary(&self) -> bool {
        self.binary
    }

    /// The content as UTF-8 text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// One entry of a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeEntry {
    name: Vec<u8>,
    mode: FileMode,
    target: ObjectRef,
}

impl TreeEntry {
    pub(crate) fn new(name: Vec<u8>, mode: FileMode, target: ObjectRef) -> Self {
        Self { name, mode, target }
    }

    /// Entry name, lossily decoded as UTF-8.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Entry name exactly as stored.
    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn id(&self) -> &ObjectId {
        &self.target.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.target.kind
    }

    pub fn target(&self) -> ObjectRef {
        self.target
    }

    pub fn is_tree(&self) -> bool {
        self.mode == FileMode::Tree
    }
}

/// Git's canonical ordering of tree entries.
///
/// Names compare byte-wise, with subtree names compared as if they ended in
/// `/`. This is the order Git writes trees in, so tree hashes agree.
pub fn canonical_entry_order(a: &TreeEntry, b: &TreeEntry) -> Ordering {
    let suffix = |entry: &TreeEntry| entry.is_tree().then_some(b'/');
    a.name
        .iter()
        .copied()
        .chain(suffix(a))
        .cmp(b.name.iter().copied().chain(suffix(b)))
}

/// Directory listing.
#[derive(Debug, Clone)]
pub struct Tree {
    id: ObjectId,
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub(crate) fn new(id: ObjectId, mut entries: Vec<TreeEntry>) -> Self {
        // Engines return canonical order already; sorting keeps it true for
        // malformed trees written by other tools.
        entries.sort_by(canonical_entry_order);
        Self { id, entries }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.get_bytes(name.as_bytes())
    }

    /// Find an entry by its raw name.
    pub fn get_bytes(&self, name: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a TreeEntry;
    type IntoIter = std::slice::Iter<'a, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Revision snapshot.
///
/// Parents are kept in recorded order; the first parent is the mainline.
#[derive(Debug, Clone)]
pub struct Commit {
    id: ObjectId,
    tree: ObjectId,
    parents: Vec<ObjectId>,
    author: Signature,
    committer: Signature,
    message: String,
}

impl Commit {
    pub(crate) fn new(
        id: ObjectId,
        tree: ObjectId,
        parents: Vec<ObjectId>,
        author: Signature,
        committer: Signature,
        message: String,
    ) -> Self {
        Self {
            id,
            tree,
            parents,
            author,
            committer,
            message,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Id of the root tree of this snapshot.
    pub fn tree(&self) -> &ObjectId {
        &self.tree
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// The first parent, followed by first-parent traversals.
    pub fn mainline_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, ignoring leading blank lines.
    pub fn summary(&self) -> &str {
        self.message
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }

    /// Message after the first paragraph, if any.
    pub fn body(&self) -> Option<&str> {
        let message = self.message.trim_start();
        let (_, rest) = message.split_once("\n\n")?;
        let rest = rest.trim();
        (!rest.is_empty()).then_some(rest)
    }
}

/// Annotated tag.
///
/// Lightweight tags have no object of their own; see
/// [`crate::core::reference::TagReference`].
#[derive(Debug, Clone)]
pub struct Tag {
    id: ObjectId,
    name: String,
    target: ObjectRef,
    tagger: Option<Signature>,
    message: String,
}

impl Tag {
    pub(crate) fn new(
        id: ObjectId,
        name: String,
        target: ObjectRef,
        tagger: Option<Signature>,
        message: String,
    ) -> Self {
        Self {
            id,
            name,
            target,
            tagger,
            message,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tagged object.
    pub fn target(&self) -> ObjectRef {
        self.target
    }

    /// The tagger. Git allows tags written without one.
    pub fn tagger(&self) -> Option<&Signature> {
        self.tagger.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

macro_rules! identity_by_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    self.id == other.id
                }
            }

            impl Eq for $ty {}

            impl Hash for $ty {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.id.hash(state);
                }
            }
        )+
    };
}

identity_by_id!(Blob, Tree, Commit, Tag);

/// Any repository object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    pub fn id(&self) -> &ObjectId {
        match self {
            Object::Blob(blob) => blob.id(),
            Object::Tree(tree) => tree.id(),
            Object::Commit(commit) => commit.id(),
            Object::Tag(tag) => tag.id(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Blob(_) => ObjectKind::Blob,
            Object::Tree(_) => ObjectKind::Tree,
            Object::Commit(_) => ObjectKind::Commit,
            Object::Tag(_) => ObjectKind::Tag,
        }
    }

    /// The id and kind of this object.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(*self.id(), self.kind())
    }
}

/// A concrete object kind that can be extracted from an [`Object`].
///
/// Drives typed lookup: the repository loads an [`Object`] and asks the
/// target type to claim it.
pub trait RepositoryObject: Sized {
    /// The kind this type represents.
    const KIND: ObjectKind;

    fn id(&self) -> &ObjectId;

    /// Claim `object` if it has this type's kind, or hand it back.
    fn from_object(object: Object) -> Result<Self, Object>;
}

macro_rules! repository_object {
    ($ty:ident) => {
        impl RepositoryObject for $ty {
            const KIND: ObjectKind = ObjectKind::$ty;

            fn id(&self) -> &ObjectId {
                &self.id
            }

            fn from_object(object: Object) -> Result<Self, Object> {
                match object {
                    Object::$ty(value) => Ok(value),
                    other => Err(other),
                }
            }
        }

        impl From<$ty> for Object {
            fn from(value: $ty) -> Self {
                Object::$ty(value)
            }
        }
    };
}

repository_object!(Blob);
repository_object!(Tree);
repository_object!(Commit);
repository_object!(Tag);
