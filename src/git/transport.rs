//! git::transport
//!
//! The seam to the external network collaborator.
//!
//! # Design
//!
//! This crate manages remote configuration but never moves objects over
//! the network. [`Transport`] implementations do that, with credentials
//! supplied by a [`CredentialsProvider`]. The repository only passes the
//! provider through; it never inspects credentials.
//!
//! A fetch leaves the transferred objects in the object database and
//! reports the remote-tracking references it wants moved. The repository
//! then applies those updates (see [`crate::git::Repository::fetch`]).
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include secrets in error messages
//! - Be thread-safe (Send + Sync)

use std::path::PathBuf;

use thiserror::Error;

use crate::core::remote::Remote;
use crate::core::types::{ObjectId, RefName};

/// A credential handed to a transport.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Plain username and password (or token).
    UserPass { username: String, password: String },

    /// SSH key pair on disk.
    SshKey {
        username: String,
        public_key: Option<PathBuf>,
        private_key: PathBuf,
        passphrase: Option<String>,
    },

    /// Keys held by a running SSH agent.
    SshAgent { username: String },

    /// Platform default credentials (e.g. Kerberos/NTLM).
    Default,
}

impl Credential {
    /// The username, if the credential carries one.
    pub fn username(&self) -> Option<&str> {
        match self {
            Credential::UserPass { username, .. }
            | Credential::SshKey { username, .. }
            | Credential::SshAgent { username } => Some(username),
            Credential::Default => None,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets are never printed
        match self {
            Credential::UserPass { username, .. } => f
                .debug_struct("UserPass")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Credential::SshKey {
                username,
                public_key,
                private_key,
                passphrase,
            } => f
                .debug_struct("SshKey")
                .field("username", username)
                .field("public_key", public_key)
                .field("private_key", private_key)
                .field("passphrase", &passphrase.as_ref().map(|_| "[REDACTED]"))
                .finish(),
            Credential::SshAgent { username } => f
                .debug_struct("SshAgent")
                .field("username", username)
                .finish(),
            Credential::Default => f.write_str("Default"),
        }
    }
}

/// Supplies credentials on demand.
pub trait CredentialsProvider: Send + Sync {
    /// Credential for `url`, given the username from the URL if it had one.
    ///
    /// Returns `None` when nothing is available; the transport decides
    /// whether to proceed anonymously.
    fn credential(&self, url: &str, username: Option<&str>) -> Option<Credential>;
}

/// A provider that never has credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialsProvider for NoCredentials {
    fn credential(&self, _url: &str, _username: Option<&str>) -> Option<Credential> {
        None
    }
}

/// A provider that returns the same credential for every URL.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credential);

impl CredentialsProvider for StaticCredentials {
    fn credential(&self, _url: &str, _username: Option<&str>) -> Option<Credential> {
        Some(self.0.clone())
    }
}

/// Errors reported by a transport.
///
/// Messages must not contain credential values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("rejected by remote: {0}")]
    Rejected(String),
}

/// A remote-tracking reference moved by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    pub name: RefName,
    pub target: ObjectId,
}

/// What a fetch transferred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// References to move. Their targets must already be in the object database.
    pub updates: Vec<RefUpdate>,
}

/// Moves objects between this repository and a remote.
pub trait Transport: Send + Sync {
    /// Download from `remote` using its fetch refspecs.
    fn fetch(
        &self,
        remote: &Remote,
        credentials: &dyn CredentialsProvider,
    ) -> Result<FetchOutcome, TransportError>;

    /// Upload `refspecs` to `remote`.
    fn push(
        &self,
        remote: &Remote,
        refspecs: &[String],
        credentials: &dyn CredentialsProvider,
    ) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_credentials_is_empty() {
        assert!(NoCredentials.credential("https://example.com/r.git", None).is_none());
    }

    #[test]
    fn static_credentials_always_answer() {
        let provider = StaticCredentials(Credential::SshAgent {
            username: "git".into(),
        });
        let credential = provider.credential("ssh://example.com/r.git", Some("git"));
        assert_eq!(credential.as_ref().and_then(Credential::username), Some("git"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let credential = Credential::UserPass {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let shown = format!("{credential:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));

        let key = Credential::SshKey {
            username: "git".into(),
            public_key: None,
            private_key: PathBuf::from("/keys/id_ed25519"),
            passphrase: Some("open sesame".into()),
        };
        let shown = format!("{key:?}");
        assert!(!shown.contains("open sesame"));
        assert!(shown.contains("id_ed25519"));
    }

    #[test]
    fn default_has_no_username() {
        assert_eq!(Credential::Default.username(), None);
    }
}
