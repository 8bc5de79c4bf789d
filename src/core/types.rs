//! core::types
//!
//! Strong types for the values this crate hands back to callers.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA-1 or SHA-256 hex)
//! - [`BranchScope`] - Which branch namespaces an enumeration covers
//! - [`Signature`] - Author/committer identity with a UTC timestamp
//! - [`Commit`] - A commit hydrated from the object database
//!
//! # Validation
//!
//! `Oid` enforces validity at construction time. Everything else is a plain
//! data carrier built by the [`crate::git`] layer.
//!
//! # Examples
//!
//! ```
//! use repolens::core::types::Oid;
//!
//! let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
//! assert!(Oid::new("not-a-sha").is_err());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid branch scope: {0}")]
    InvalidBranchScope(String),
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use repolens::core::types::Oid;
///
/// let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a full hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters, or the full OID if `len` is
    /// longer than it.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<git2::Oid> for Oid {
    fn from(oid: git2::Oid) -> Self {
        // libgit2 always renders full lowercase hex
        Self(oid.to_string())
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which branch namespaces a branch enumeration covers.
///
/// `All` matches what a hosting UI shows for a mirror: local branches plus
/// remote-tracking ones (reported as `origin/main` and so on).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchScope {
    /// Only `refs/heads/*`.
    Local,
    /// Local and remote-tracking branches.
    #[default]
    All,
}

impl std::str::FromStr for BranchScope {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(BranchScope::Local),
            "all" => Ok(BranchScope::All),
            other => Err(TypeError::InvalidBranchScope(format!(
                "'{}', must be one of: local, all",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BranchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchScope::Local => write!(f, "local"),
            BranchScope::All => write!(f, "all"),
        }
    }
}

/// Identity and timestamp attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub time: DateTime<Utc>,
}

/// A commit hydrated from the object database.
///
/// The history walker only ever inspects `parents`; the remaining fields are
/// carried through for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// The commit OID
    pub oid: Oid,
    /// Parent OIDs, in order. Empty for root commits.
    pub parents: Vec<Oid>,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
}

impl Commit {
    /// Check if this commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}
