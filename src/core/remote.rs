//! core::remote
//!
//! Named remote endpoint configuration.
//!
//! A [`Remote`] is a configuration record only: fetch and push URLs and
//! refspecs. Moving objects over the network belongs to the transport
//! collaborator (see [`crate::git::transport`]).

use serde::Serialize;

use super::types::{RefName, TypeError};

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Remote {
    name: String,
    url: String,
    push_url: Option<String>,
    fetch_refspecs: Vec<String>,
    push_refspecs: Vec<String>,
}

impl Remote {
    pub(crate) fn new(
        name: String,
        url: String,
        push_url: Option<String>,
        fetch_refspecs: Vec<String>,
        push_refspecs: Vec<String>,
    ) -> Self {
        Self {
            name,
            url,
            push_url,
            fetch_refspecs,
            push_refspecs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fetch URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The push URL, if one is configured separately.
    pub fn push_url(&self) -> Option<&str> {
        self.push_url.as_deref()
    }

    /// The URL pushes go to: the push URL if set, else the fetch URL.
    pub fn effective_push_url(&self) -> &str {
        self.push_url.as_deref().unwrap_or(&self.url)
    }

    pub fn fetch_refspecs(&self) -> &[String] {
        &self.fetch_refspecs
    }

    pub fn push_refspecs(&self) -> &[String] {
        &self.push_refspecs
    }

    pub fn summary(&self) -> RemoteSummary {
        RemoteSummary {
            name: self.name.clone(),
            url: self.url.clone(),
        }
    }
}

/// One row of a remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteSummary {
    pub name: String,
    pub url: String,
}

/// Validate a remote name.
///
/// Git requires `refs/remotes/<name>/*` to be a valid refspec, which rules
/// out the same characters as reference names.
///
/// # Example
///
/// ```
/// use gitmodel::core::remote::validate_remote_name;
///
/// assert!(validate_remote_name("origin").is_ok());
/// assert!(validate_remote_name("").is_err());
/// assert!(validate_remote_name("has space").is_err());
/// ```
pub fn validate_remote_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() {
        return Err(TypeError::InvalidRemoteName(
            "remote name cannot be empty".into(),
        ));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(TypeError::InvalidRemoteName(format!(
            "remote name cannot start or end with '/': {name}"
        )));
    }
    RefName::new(format!("{}{name}", RefName::REMOTES))
        .map(|_| ())
        .map_err(|e| TypeError::InvalidRemoteName(format!("{name}: {e}")))
}
