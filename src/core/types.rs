//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ObjectId`] - Fixed-length content hash identifying a repository object
//! - [`HashAlgorithm`] - The hash function an [`ObjectId`] was produced with
//! - [`RefName`] - Validated Git reference name
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use gitmodel::core::types::{ObjectId, RefName};
//!
//! // Valid constructions
//! let id = ObjectId::from_hex("abc123def4567890abc123def4567890abc12345").unwrap();
//! let refname = RefName::new("refs/heads/feature/my-branch").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(RefName::new("refs/heads/invalid..name").is_err());
//! assert!(ObjectId::from_hex("not-a-sha").is_err());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error("invalid remote name: {0}")]
    InvalidRemoteName(String),

    #[error("invalid object kind: {0}")]
    InvalidObjectKind(String),

    #[error("invalid file mode: {0:o}")]
    InvalidFileMode(i32),
}

/// Hash function used to address objects.
///
/// Repositories use SHA-1 unless created in SHA-256 object format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Length of a raw digest in bytes.
    pub const fn byte_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
        }
    }

    /// Length of a digest rendered as hex.
    pub const fn hex_len(self) -> usize {
        self.byte_len() * 2
    }

    fn from_byte_len(len: usize) -> Option<Self> {
        match len {
            20 => Some(HashAlgorithm::Sha1),
            32 => Some(HashAlgorithm::Sha256),
            _ => None,
        }
    }
}

/// Largest raw digest we store.
const MAX_RAW_LEN: usize = 32;

/// A Git object identifier.
///
/// Stored as raw bytes together with the hash algorithm that produced them.
/// Two ids are equal exactly when their algorithm and bytes are equal, so
/// `ObjectId` is safe to use as a map key.
///
/// # Example
///
/// ```
/// use gitmodel::core::types::{HashAlgorithm, ObjectId};
///
/// // Parsing normalizes to lowercase
/// let id = ObjectId::from_hex("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(id.to_hex(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(id.algorithm(), HashAlgorithm::Sha1);
///
/// // Abbreviated form
/// assert_eq!(id.short(7), "abc123d");
///
/// // Raw bytes must have an exact digest length
/// assert!(ObjectId::from_bytes(&[0u8; 20]).is_ok());
/// assert!(ObjectId::from_bytes(&[0u8; 19]).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId {
    algorithm: HashAlgorithm,
    bytes: [u8; MAX_RAW_LEN],
}

impl ObjectId {
    /// Parse an object id from its hex representation.
    ///
    /// Accepts 40 (SHA-1) or 64 (SHA-256) hex characters in either case.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the length or character set is wrong.
    pub fn from_hex(hex_str: &str) -> Result<Self, TypeError> {
        let algorithm = match hex_str.len() {
            40 => HashAlgorithm::Sha1,
            64 => HashAlgorithm::Sha256,
            len => {
                return Err(TypeError::InvalidOid(format!(
                    "expected 40 or 64 hex characters, got {len}"
                )))
            }
        };

        let raw = hex::decode(hex_str)
            .map_err(|_| TypeError::InvalidOid("object id must be hexadecimal".into()))?;

        Self::from_bytes_with(algorithm, &raw)
    }

    /// Build an object id from a raw digest, inferring the algorithm from its length.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` unless `raw` is exactly 20 or 32 bytes.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, TypeError> {
        let algorithm = HashAlgorithm::from_byte_len(raw.len()).ok_or_else(|| {
            TypeError::InvalidOid(format!("expected 20 or 32 bytes, got {}", raw.len()))
        })?;
        Self::from_bytes_with(algorithm, raw)
    }

    /// Build an object id for a specific algorithm.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if `raw` is not exactly
    /// `algorithm.byte_len()` bytes long.
    pub fn from_bytes_with(algorithm: HashAlgorithm, raw: &[u8]) -> Result<Self, TypeError> {
        if raw.len() != algorithm.byte_len() {
            return Err(TypeError::InvalidOid(format!(
                "expected {} bytes for {:?}, got {}",
                algorithm.byte_len(),
                algorithm,
                raw.len()
            )));
        }
        let mut bytes = [0u8; MAX_RAW_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self { algorithm, bytes })
    }

    /// Build a SHA-1 object id from a digest that is already the right size.
    pub const fn from_sha1(raw: [u8; 20]) -> Self {
        let mut bytes = [0u8; MAX_RAW_LEN];
        let mut i = 0;
        while i < 20 {
            bytes[i] = raw[i];
            i += 1;
        }
        Self {
            algorithm: HashAlgorithm::Sha1,
            bytes,
        }
    }

    /// The zero/null SHA-1 id.
    ///
    /// # Example
    ///
    /// ```
    /// use gitmodel::core::types::ObjectId;
    ///
    /// let zero = ObjectId::zero();
    /// assert!(zero.is_zero());
    /// assert_eq!(zero.to_hex().len(), 40);
    /// ```
    pub const fn zero() -> Self {
        Self::from_sha1([0u8; 20])
    }

    /// Check if this is the zero/null id.
    pub fn is_zero(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }

    /// The algorithm this id was produced with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.algorithm.byte_len()]
    }

    /// Full lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Get an abbreviated hex form.
    ///
    /// Returns the first `len` hex characters, or the full id if `len`
    /// exceeds its length.
    pub fn short(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len);
        hex
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_hex()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

/// A validated Git reference name.
///
/// Reference names must conform to Git's refname rules (see `git check-ref-format`).
/// Top-level pseudo refs such as `HEAD` and `FETCH_HEAD` are accepted.
///
/// # Example
///
/// ```
/// use gitmodel::core::types::RefName;
///
/// let refname = RefName::new("refs/heads/feature/foo").unwrap();
/// assert!(refname.is_branch());
/// assert_eq!(refname.shorthand(), "feature/foo");
///
/// let tag = RefName::for_tag("v1.0").unwrap();
/// assert_eq!(tag.as_str(), "refs/tags/v1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

impl RefName {
    /// Namespace of local branches.
    pub const HEADS: &'static str = "refs/heads/";
    /// Namespace of tags.
    pub const TAGS: &'static str = "refs/tags/";
    /// Namespace of remote-tracking branches.
    pub const REMOTES: &'static str = "refs/remotes/";

    /// Create a new validated ref name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name == "@" {
            return Err(TypeError::InvalidRefName(
                "ref name cannot be '@' (reserved)".into(),
            ));
        }
        validate_refname(&name).map_err(TypeError::InvalidRefName)?;
        Ok(Self(name))
    }

    /// The `HEAD` pseudo reference.
    pub fn head() -> Self {
        Self("HEAD".to_string())
    }

    /// Create a ref name for a tag (`refs/tags/<tag>`).
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the resulting name is invalid.
    pub fn for_tag(tag: &str) -> Result<Self, TypeError> {
        Self::new(format!("{}{}", Self::TAGS, tag))
    }

    /// Check if this ref is a local branch.
    pub fn is_branch(&self) -> bool {
        self.0.starts_with(Self::HEADS)
    }

    /// Check if this ref is a remote-tracking branch.
    pub fn is_remote_branch(&self) -> bool {
        self.0.starts_with(Self::REMOTES)
    }

    /// Check if this ref is a tag.
    pub fn is_tag(&self) -> bool {
        self.0.starts_with(Self::TAGS)
    }

    /// The human-readable short form of the name.
    ///
    /// `refs/heads/main` becomes `main`, `refs/remotes/origin/main` becomes
    /// `origin/main`, and so on. Names outside the well-known namespaces are
    /// returned unchanged.
    pub fn shorthand(&self) -> &str {
        [Self::HEADS, Self::TAGS, Self::REMOTES, "refs/"]
            .iter()
            .find_map(|prefix| self.0.strip_prefix(prefix))
            .unwrap_or(&self.0)
    }

    /// Get the ref name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RefName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check a name against Git's refname rules, returning the reason on failure.
fn validate_refname(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name cannot be empty".into());
    }

    if name.starts_with('/') {
        return Err("name cannot start with '/'".into());
    }

    if name.ends_with('/') {
        return Err("name cannot end with '/'".into());
    }
    if name.ends_with('.') {
        return Err("name cannot end with '.'".into());
    }

    for pattern in ["..", "@{", "//"] {
        if name.contains(pattern) {
            return Err(format!("name cannot contain '{pattern}'"));
        }
    }

    const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
    for c in INVALID_CHARS {
        if name.contains(c) {
            return Err(format!("name cannot contain '{c}'"));
        }
    }

    if name.chars().any(|c| c.is_ascii_control()) {
        return Err("name cannot contain control characters".into());
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err("path component cannot start with '.'".into());
        }
        if component.ends_with(".lock") {
            return Err("path component cannot end with '.lock'".into());
        }
    }

    Ok(())
}
