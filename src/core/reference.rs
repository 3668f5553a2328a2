//! core::reference
//!
//! References, branches, tags, and bounded symbolic resolution.
//!
//! # Resolution
//!
//! A symbolic reference names another reference; a direct reference names
//! an object. Resolution follows symbolic hops until a direct reference is
//! reached. It is driven by [`ResolveState`]:
//!
//! ```text
//! Named --lookup--> Resolving(0)
//! Resolving(d) --symbolic--> Resolving(d+1)    if d+1 <= max_depth
//! Resolving(d) --symbolic--> Failed(MaxDepthExceeded)
//! Resolving(d) --seen before--> Failed(Cycle)
//! Resolving(d) --direct--> Resolved(id)
//! Resolving(d) --missing--> Failed(NotFound)
//! ```
//!
//! [`resolve_chain`] runs this machine as a loop, so a corrupt repository can
//! never drive unbounded recursion.

use std::collections::HashSet;

use thiserror::Error;

use super::object::{ObjectRef, Tag};
use super::types::{ObjectId, RefName};

/// Default bound on symbolic hops during resolution.
pub const DEFAULT_MAX_SYMBOLIC_DEPTH: usize = 5;

/// Largest bound a configuration may request.
pub const MAX_SYMBOLIC_DEPTH_LIMIT: usize = 32;

/// What a reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// An object id.
    Direct(ObjectId),
    /// Another reference, by name.
    Symbolic(RefName),
}

/// A named pointer, as stored (not resolved).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    name: RefName,
    target: ReferenceTarget,
}

impl Reference {
    pub(crate) fn new(name: RefName, target: ReferenceTarget) -> Self {
        Self { name, target }
    }

    pub fn name(&self) -> &RefName {
        &self.name
    }

    pub fn shorthand(&self) -> &str {
        self.name.shorthand()
    }

    pub fn target(&self) -> &ReferenceTarget {
        &self.target
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self.target, ReferenceTarget::Symbolic(_))
    }

    /// The object id, if this is a direct reference.
    pub fn direct_target(&self) -> Option<&ObjectId> {
        match &self.target {
            ReferenceTarget::Direct(id) => Some(id),
            ReferenceTarget::Symbolic(_) => None,
        }
    }

    /// The referenced name, if this is a symbolic reference.
    pub fn symbolic_target(&self) -> Option<&RefName> {
        match &self.target {
            ReferenceTarget::Direct(_) => None,
            ReferenceTarget::Symbolic(name) => Some(name),
        }
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            ReferenceTarget::Direct(id) => write!(f, "{} {}", id, self.name),
            ReferenceTarget::Symbolic(target) => write!(f, "ref: {} {}", target, self.name),
        }
    }
}

/// Whether a branch is local or remote-tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    Local,
    Remote,
}

impl BranchKind {
    /// Ref namespace for this kind of branch.
    pub fn namespace(&self) -> &'static str {
        match self {
            BranchKind::Local => RefName::HEADS,
            BranchKind::Remote => RefName::REMOTES,
        }
    }
}

/// A local or remote-tracking branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch {
    name: RefName,
    kind: BranchKind,
    commit: ObjectId,
}

impl Branch {
    pub(crate) fn new(name: RefName, kind: BranchKind, commit: ObjectId) -> Self {
        Self { name, kind, commit }
    }

    /// Full reference name, e.g. `refs/heads/main`.
    pub fn name(&self) -> &RefName {
        &self.name
    }

    /// Short name, e.g. `main` or `origin/main`.
    pub fn short_name(&self) -> &str {
        self.name.shorthand()
    }

    pub fn kind(&self) -> BranchKind {
        self.kind
    }

    pub fn is_local(&self) -> bool {
        self.kind == BranchKind::Local
    }

    pub fn is_remote(&self) -> bool {
        self.kind == BranchKind::Remote
    }

    /// The remote a remote-tracking branch belongs to.
    pub fn remote_name(&self) -> Option<&str> {
        if self.kind != BranchKind::Remote {
            return None;
        }
        self.short_name().split_once('/').map(|(remote, _)| remote)
    }

    /// Id of the commit at the tip of the branch.
    pub fn commit(&self) -> &ObjectId {
        &self.commit
    }
}

/// A tag reference: either a bare pointer or a pointer to a tag object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagReference {
    /// `refs/tags/<name>` pointing straight at an object.
    Lightweight { name: RefName, target: ObjectRef },
    /// `refs/tags/<name>` pointing at an annotated tag object.
    Annotated { name: RefName, tag: Tag },
}

impl TagReference {
    pub fn name(&self) -> &RefName {
        match self {
            TagReference::Lightweight { name, .. } | TagReference::Annotated { name, .. } => name,
        }
    }

    pub fn short_name(&self) -> &str {
        self.name().shorthand()
    }

    /// The id the reference itself stores (the tag object for annotated tags).
    pub fn id(&self) -> &ObjectId {
        match self {
            TagReference::Lightweight { target, .. } => &target.id,
            TagReference::Annotated { tag, .. } => tag.id(),
        }
    }

    /// The labelled object, looking through an annotated tag.
    pub fn target(&self) -> ObjectRef {
        match self {
            TagReference::Lightweight { target, .. } => *target,
            TagReference::Annotated { tag, .. } => tag.target(),
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, TagReference::Annotated { .. })
    }
}

/// Why a resolution ended without an object id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveFailure {
    #[error("reference not found: {0}")]
    NotFound(RefName),

    #[error("symbolic reference cycle at {0}")]
    Cycle(RefName),

    #[error("resolving {name} exceeded {max_depth} symbolic hops")]
    MaxDepthExceeded { name: RefName, max_depth: usize },
}

/// States of the resolution machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    Named(RefName),
    Resolving { name: RefName, depth: usize },
    Resolved(ObjectId),
    Failed(ResolveFailure),
}

impl ResolveState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolveState::Resolved(_) | ResolveState::Failed(_))
    }
}

/// Follow symbolic references from `start` to an object id.
///
/// `lookup` returns the stored target of a reference, or `None` if it does
/// not exist. At most `max_depth` symbolic hops are followed.
///
/// # Errors
///
/// Lookup errors propagate unchanged. Resolution failures are converted
/// into `E` via `From<ResolveFailure>`.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use gitmodel::core::reference::{resolve_chain, ReferenceTarget, ResolveFailure};
/// use gitmodel::core::types::{ObjectId, RefName};
///
/// let main = RefName::new("refs/heads/main").unwrap();
/// let head = RefName::head();
/// let tip = ObjectId::from_sha1([1; 20]);
///
/// let mut refs = HashMap::new();
/// refs.insert(head.clone(), ReferenceTarget::Symbolic(main.clone()));
/// refs.insert(main, ReferenceTarget::Direct(tip));
///
/// let id = resolve_chain::<_, ResolveFailure>(&head, 5, |name| Ok(refs.get(name).cloned()));
/// assert_eq!(id, Ok(tip));
/// ```
pub fn resolve_chain<F, E>(start: &RefName, max_depth: usize, mut lookup: F) -> Result<ObjectId, E>
where
    F: FnMut(&RefName) -> Result<Option<ReferenceTarget>, E>,
    E: From<ResolveFailure>,
{
    let mut visited = HashSet::new();
    let mut state = ResolveState::Named(start.clone());

    loop {
        state = match state {
            ResolveState::Named(name) => ResolveState::Resolving { name, depth: 0 },
            ResolveState::Resolving { name, depth } => {
                if !visited.insert(name.clone()) {
                    ResolveState::Failed(ResolveFailure::Cycle(name))
                } else {
                    match lookup(&name)? {
                        None => ResolveState::Failed(ResolveFailure::NotFound(name)),
                        Some(ReferenceTarget::Direct(id)) => ResolveState::Resolved(id),
                        Some(ReferenceTarget::Symbolic(next)) if depth < max_depth => {
                            ResolveState::Resolving {
                                name: next,
                                depth: depth + 1,
                            }
                        }
                        Some(ReferenceTarget::Symbolic(_)) => {
                            ResolveState::Failed(ResolveFailure::MaxDepthExceeded {
                                name: start.clone(),
                                max_depth,
                            })
                        }
                    }
                }
            }
            ResolveState::Resolved(id) => return Ok(id),
            ResolveState::Failed(failure) => return Err(failure.into()),
        };
    }
}

/// Full names a short reference name may stand for, in lookup order.
///
/// Mirrors Git's rules for interpreting `<refname>` on the command line.
///
/// # Example
///
/// ```
/// use gitmodel::core::reference::expand_shorthand;
///
/// let candidates = expand_shorthand("main");
/// assert_eq!(candidates[0], "main");
/// assert!(candidates.contains(&"refs/heads/main".to_string()));
/// ```
pub fn expand_shorthand(name: &str) -> Vec<String> {
    if name.starts_with("refs/") {
        return vec![name.to_string()];
    }
    vec![
        name.to_string(),
        format!("refs/{name}"),
        format!("{}{name}", RefName::TAGS),
        format!("{}{name}", RefName::HEADS),
        format!("{}{name}", RefName::REMOTES),
        format!("{}{name}/HEAD", RefName::REMOTES),
    ]
}
