//! git::error
//!
//! Error translation and the error taxonomy of the repository layer.
//!
//! # Translation
//!
//! [`translate`] turns a libgit2 failure into an [`EngineError`]: a domain,
//! the numeric code, a human description, and the name of the failing
//! operation kept as a separate field so callers can match on it.
//!
//! # Classification
//!
//! Every engine call site classifies its failure immediately with
//! [`classify`], using the [`Op`] context of the call to choose a
//! [`GitError`] variant. Anything that fits no specific variant becomes
//! [`GitError::EngineFailure`] carrying the translated error. No raw engine
//! codes escape this module.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::core::object::ObjectKind;
use crate::core::reference::ResolveFailure;
use crate::core::types::{ObjectId, TypeError};

/// Error domain reported for engine failures.
pub const ENGINE_DOMAIN: &str = "org.libgit2.libgit2";

/// Description used when the engine left no message behind.
pub const UNKNOWN_ENGINE_ERROR: &str = "Unknown libgit2 error.";

/// A translated libgit2 failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    /// Always [`ENGINE_DOMAIN`].
    pub domain: &'static str,
    /// The engine's numeric status code (negative on failure).
    pub code: i32,
    /// The engine's error class, by name.
    pub class: String,
    /// Human-readable description.
    pub message: String,
    /// Which operation failed, e.g. `"git_reference_lookup failed."`.
    pub failure_reason: Option<String>,
}

/// Translate an engine error into an [`EngineError`].
///
/// Never fails: when the engine recorded no message, an OS error
/// description or a generic fallback is used instead.
pub fn translate(err: &git2::Error, operation: Option<&str>) -> EngineError {
    let os_error = err.class() == git2::ErrorClass::Os;
    EngineError {
        domain: ENGINE_DOMAIN,
        code: err.raw_code(),
        class: format!("{:?}", err.class()),
        message: describe(Some(err.message()), os_error, || {
            let os = std::io::Error::last_os_error();
            os.raw_os_error().map(|_| os.to_string())
        }),
        failure_reason: operation.map(|op| format!("{op} failed.")),
    }
}

/// Pick the description for an engine failure.
///
/// Prefers the engine's own message, then the OS error text for OS-class
/// failures, then [`UNKNOWN_ENGINE_ERROR`].
pub(crate) fn describe(
    message: Option<&str>,
    os_error: bool,
    os_message: impl FnOnce() -> Option<String>,
) -> String {
    if let Some(message) = message.map(str::trim).filter(|m| !m.is_empty()) {
        return message.to_string();
    }
    if os_error {
        if let Some(message) = os_message() {
            return message;
        }
    }
    UNKNOWN_ENGINE_ERROR.to_string()
}

/// Errors from repository operations.
///
/// The categorization lets callers handle each failure distinctly without
/// inspecting engine codes. Variants that can arise from a failed engine
/// call keep the translated [`EngineError`] as their source; it is `None`
/// when the crate detected the condition itself.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at (or above) the path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
        #[source]
        engine: Option<EngineError>,
    },

    /// Repository has no working directory and bare repositories are disallowed.
    #[error("bare repository not allowed: {path}")]
    BareRepo {
        /// The repository's git directory
        path: PathBuf,
    },

    /// No object with this id.
    #[error("object not found: {id}")]
    ObjectNotFound {
        id: ObjectId,
        #[source]
        engine: Option<EngineError>,
    },

    /// The object exists but is of another kind.
    #[error("object {id} is a {actual}, not a {expected}")]
    ObjectTypeMismatch {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// The engine could not read or parse the object.
    #[error("corrupt object {id}: {message}")]
    CorruptObject {
        id: ObjectId,
        message: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// No reference with this name.
    #[error("reference not found: {name}")]
    ReferenceNotFound {
        name: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// A reference with this name already exists.
    #[error("reference already exists: {name}")]
    ReferenceExists {
        name: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// Symbolic references loop back on themselves.
    #[error("symbolic reference cycle at {name}")]
    ReferenceCycle { name: String },

    /// Too many symbolic hops.
    #[error("resolving {name} exceeded {max_depth} symbolic hops")]
    MaxDepthExceeded { name: String, max_depth: usize },

    /// The revision expression is malformed or ambiguous.
    #[error("invalid revision '{spec}': {message}")]
    InvalidRevisionSyntax {
        spec: String,
        message: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// The revision expression names nothing.
    #[error("revision not found: {spec}")]
    RevisionNotFound {
        spec: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// Malformed object id, reference name, or remote name.
    #[error("invalid format: {message}")]
    InvalidFormat {
        message: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// No remote with this name.
    #[error("remote not found: {name}")]
    RemoteNotFound {
        name: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// A remote with this name already exists.
    #[error("remote already exists: {name}")]
    RemoteExists {
        name: String,
        #[source]
        engine: Option<EngineError>,
    },

    /// A long-running operation was cancelled by its caller.
    #[error("operation cancelled")]
    Cancelled,

    /// The transport collaborator failed.
    #[error("transport failed for remote {remote}: {message}")]
    Transport { remote: String, message: String },

    /// Any other engine failure.
    #[error("git engine failure: {0}")]
    EngineFailure(#[source] EngineError),
}

impl GitError {
    /// The translated engine error, for failures that came from the engine.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            GitError::EngineFailure(engine) => Some(engine),
            GitError::NotARepo { engine, .. }
            | GitError::ObjectNotFound { engine, .. }
            | GitError::CorruptObject { engine, .. }
            | GitError::ReferenceNotFound { engine, .. }
            | GitError::ReferenceExists { engine, .. }
            | GitError::InvalidRevisionSyntax { engine, .. }
            | GitError::RevisionNotFound { engine, .. }
            | GitError::InvalidFormat { engine, .. }
            | GitError::RemoteNotFound { engine, .. }
            | GitError::RemoteExists { engine, .. } => engine.as_ref(),
            _ => None,
        }
    }

    /// Invalid input detected before reaching the engine.
    pub(crate) fn invalid_format(message: impl Into<String>) -> Self {
        GitError::InvalidFormat {
            message: message.into(),
            engine: None,
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        GitError::invalid_format(err.to_string())
    }
}

impl From<ResolveFailure> for GitError {
    fn from(failure: ResolveFailure) -> Self {
        match failure {
            ResolveFailure::NotFound(name) => GitError::ReferenceNotFound {
                name: name.into(),
                engine: None,
            },
            ResolveFailure::Cycle(name) => GitError::ReferenceCycle { name: name.into() },
            ResolveFailure::MaxDepthExceeded { name, max_depth } => GitError::MaxDepthExceeded {
                name: name.into(),
                max_depth,
            },
        }
    }
}

/// The context of an engine call, used to classify its failure.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Op<'a> {
    /// Opening a repository at a path.
    Open(&'a std::path::Path),
    /// Reading an object.
    Object(&'a ObjectId),
    /// Reading a reference.
    Reference(&'a str),
    /// Creating, renaming, or deleting a reference.
    ReferenceWrite(&'a str),
    /// Parsing a revision expression.
    Revision(&'a str),
    /// Reading or writing remote configuration.
    Remote(&'a str),
    /// Anything else.
    Other,
}

/// Translate and classify an engine failure.
///
/// `operation` names the libgit2 function that failed.
pub(crate) fn classify(err: git2::Error, operation: &str, op: Op<'_>) -> GitError {
    use git2::{ErrorClass, ErrorCode};

    let engine = translate(&err, Some(operation));
    debug!(
        operation,
        code = engine.code,
        class = %engine.class,
        message = %engine.message,
        "libgit2 call failed"
    );

    let code = err.code();
    let class = err.class();
    match (op, code) {
        (Op::Open(path), ErrorCode::NotFound) => GitError::NotARepo {
            path: path.to_path_buf(),
            engine: Some(engine),
        },

        (Op::Object(id), ErrorCode::NotFound) => GitError::ObjectNotFound {
            id: *id,
            engine: Some(engine),
        },
        (Op::Object(id), _)
            if matches!(
                class,
                ErrorClass::Odb | ErrorClass::Object | ErrorClass::Zlib | ErrorClass::Tree | ErrorClass::Tag
            ) =>
        {
            GitError::CorruptObject {
                id: *id,
                message: engine.message.clone(),
                engine: Some(engine),
            }
        }

        (Op::Reference(name) | Op::ReferenceWrite(name), ErrorCode::NotFound) => {
            GitError::ReferenceNotFound {
                name: name.to_string(),
                engine: Some(engine),
            }
        }
        (Op::ReferenceWrite(name), ErrorCode::Exists) => GitError::ReferenceExists {
            name: name.to_string(),
            engine: Some(engine),
        },
        (Op::Reference(_) | Op::ReferenceWrite(_), ErrorCode::InvalidSpec) => {
            GitError::InvalidFormat {
                message: engine.message.clone(),
                engine: Some(engine),
            }
        }

        (Op::Revision(spec), ErrorCode::NotFound | ErrorCode::UnbornBranch | ErrorCode::Peel) => {
            GitError::RevisionNotFound {
                spec: spec.to_string(),
                engine: Some(engine),
            }
        }
        (Op::Revision(spec), ErrorCode::InvalidSpec | ErrorCode::Ambiguous | ErrorCode::Invalid) => {
            GitError::InvalidRevisionSyntax {
                spec: spec.to_string(),
                message: engine.message.clone(),
                engine: Some(engine),
            }
        }

        (Op::Remote(name), ErrorCode::NotFound) => GitError::RemoteNotFound {
            name: name.to_string(),
            engine: Some(engine),
        },
        (Op::Remote(name), ErrorCode::Exists) => GitError::RemoteExists {
            name: name.to_string(),
            engine: Some(engine),
        },
        (Op::Remote(_), ErrorCode::InvalidSpec) => GitError::InvalidFormat {
            message: engine.message.clone(),
            engine: Some(engine),
        },

        _ => GitError::EngineFailure(engine),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{ErrorClass, ErrorCode};

    fn engine_err(code: ErrorCode, class: ErrorClass, message: &str) -> git2::Error {
        git2::Error::new(code, class, message)
    }

    fn id() -> ObjectId {
        ObjectId::from_sha1([3; 20])
    }

    mod translate {
        use super::*;

        #[test]
        fn keeps_code_message_and_operation() {
            let err = engine_err(ErrorCode::NotFound, ErrorClass::Reference, "no such ref");
            let engine = translate(&err, Some("git_reference_lookup"));

            assert_eq!(engine.domain, "org.libgit2.libgit2");
            assert_eq!(engine.code, -3);
            assert_eq!(engine.class, "Reference");
            assert_eq!(engine.message, "no such ref");
            assert_eq!(
                engine.failure_reason.as_deref(),
                Some("git_reference_lookup failed.")
            );
        }

        #[test]
        fn operation_not_concatenated_into_message() {
            let err = engine_err(ErrorCode::GenericError, ErrorClass::Odb, "bad header");
            let engine = translate(&err, Some("git_object_lookup"));
            assert!(!engine.message.contains("git_object_lookup"));
            assert_eq!(engine.to_string(), "bad header");
        }

        #[test]
        fn no_operation_no_reason() {
            let err = engine_err(ErrorCode::GenericError, ErrorClass::None, "x");
            assert_eq!(translate(&err, None).failure_reason, None);
        }
    }

    mod describe {
        use super::*;

        #[test]
        fn prefers_engine_message() {
            let text = describe(Some("engine says"), true, || Some("os says".into()));
            assert_eq!(text, "engine says");
        }

        #[test]
        fn falls_back_to_os_error_for_os_class() {
            let text = describe(Some(""), true, || Some("Permission denied".into()));
            assert_eq!(text, "Permission denied");
        }

        #[test]
        fn os_text_ignored_for_other_classes() {
            let text = describe(None, false, || Some("Permission denied".into()));
            assert_eq!(text, UNKNOWN_ENGINE_ERROR);
        }

        #[test]
        fn generic_fallback_when_nothing_known() {
            assert_eq!(describe(None, true, || None), UNKNOWN_ENGINE_ERROR);
        }
    }

    mod classify {
        use super::*;

        #[test]
        fn object_errors() {
            let id = id();
            let not_found = engine_err(ErrorCode::NotFound, ErrorClass::Odb, "missing");
            assert!(matches!(
                classify(not_found, "git_object_lookup", Op::Object(&id)),
                GitError::ObjectNotFound { .. }
            ));

            let corrupt = engine_err(ErrorCode::GenericError, ErrorClass::Zlib, "bad stream");
            assert!(matches!(
                classify(corrupt, "git_object_lookup", Op::Object(&id)),
                GitError::CorruptObject { message, .. } if message == "bad stream"
            ));

            let other = engine_err(ErrorCode::GenericError, ErrorClass::Os, "disk gone");
            assert!(matches!(
                classify(other, "git_object_lookup", Op::Object(&id)),
                GitError::EngineFailure(_)
            ));
        }

        #[test]
        fn reference_errors() {
            let err = engine_err(ErrorCode::Exists, ErrorClass::Reference, "exists");
            assert!(matches!(
                classify(err, "git_reference_create", Op::ReferenceWrite("refs/heads/main")),
                GitError::ReferenceExists { name, .. } if name == "refs/heads/main"
            ));

            let err = engine_err(ErrorCode::NotFound, ErrorClass::Reference, "missing");
            assert!(matches!(
                classify(err, "git_reference_lookup", Op::Reference("refs/heads/x")),
                GitError::ReferenceNotFound { .. }
            ));

            let err = engine_err(ErrorCode::InvalidSpec, ErrorClass::Reference, "bad name");
            assert!(matches!(
                classify(err, "git_reference_lookup", Op::Reference("refs/heads/x")),
                GitError::InvalidFormat { .. }
            ));
        }

        #[test]
        fn revision_errors() {
            let err = engine_err(ErrorCode::NotFound, ErrorClass::Reference, "missing");
            assert!(matches!(
                classify(err, "git_revparse_single", Op::Revision("nope")),
                GitError::RevisionNotFound { spec, .. } if spec == "nope"
            ));

            let err = engine_err(ErrorCode::InvalidSpec, ErrorClass::Invalid, "bad syntax");
            assert!(matches!(
                classify(err, "git_revparse_single", Op::Revision("HEAD^{foo}")),
                GitError::InvalidRevisionSyntax { .. }
            ));

            let err = engine_err(ErrorCode::Ambiguous, ErrorClass::Odb, "ambiguous");
            assert!(matches!(
                classify(err, "git_revparse_single", Op::Revision("ab")),
                GitError::InvalidRevisionSyntax { .. }
            ));
        }

        #[test]
        fn remote_errors() {
            let err = engine_err(ErrorCode::Exists, ErrorClass::Config, "exists");
            assert!(matches!(
                classify(err, "git_remote_create", Op::Remote("origin")),
                GitError::RemoteExists { name, .. } if name == "origin"
            ));

            let err = engine_err(ErrorCode::NotFound, ErrorClass::Config, "missing");
            assert!(matches!(
                classify(err, "git_remote_lookup", Op::Remote("origin")),
                GitError::RemoteNotFound { .. }
            ));
        }

        #[test]
        fn classified_variants_keep_engine_details() {
            let err = engine_err(ErrorCode::Exists, ErrorClass::Reference, "already there");
            let classified = classify(err, "git_reference_create", Op::ReferenceWrite("refs/heads/main"));
            assert!(matches!(classified, GitError::ReferenceExists { .. }));

            let engine = classified.engine_error().unwrap();
            assert_eq!(engine.code, -4);
            assert_eq!(engine.message, "already there");
            assert_eq!(
                engine.failure_reason.as_deref(),
                Some("git_reference_create failed.")
            );

            let source = std::error::Error::source(&classified).unwrap();
            assert_eq!(source.to_string(), "already there");
        }

        #[test]
        fn crate_detected_errors_have_no_engine_details() {
            assert!(GitError::invalid_format("bad").engine_error().is_none());
            assert!(GitError::Cancelled.engine_error().is_none());
        }

        #[test]
        fn unclassified_keeps_engine_details() {
            let err = engine_err(ErrorCode::Locked, ErrorClass::Reference, "locked");
            let classified = classify(err, "git_reference_create", Op::Other);
            let engine = classified.engine_error().unwrap();
            assert_eq!(engine.message, "locked");
            assert_eq!(
                engine.failure_reason.as_deref(),
                Some("git_reference_create failed.")
            );
        }
    }

    #[test]
    fn resolve_failures_map_to_taxonomy() {
        use crate::core::types::RefName;

        let name = RefName::new("refs/heads/a").unwrap();
        assert!(matches!(
            GitError::from(ResolveFailure::Cycle(name.clone())),
            GitError::ReferenceCycle { .. }
        ));
        assert!(matches!(
            GitError::from(ResolveFailure::MaxDepthExceeded {
                name,
                max_depth: 5
            }),
            GitError::MaxDepthExceeded { max_depth: 5, .. }
        ));
    }

    #[test]
    fn type_errors_are_invalid_format() {
        let err: GitError = TypeError::InvalidOid("short".into()).into();
        assert!(matches!(err, GitError::InvalidFormat { .. }));
    }
}
