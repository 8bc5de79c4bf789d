//! git::interface
//!
//! Repository store implementation using git2.
//!
//! This module is the **single doorway** to libgit2. Every reference read,
//! revision parse and object lookup flows through [`Repository`], which
//! returns the crate's own types and normalizes libgit2 failures into
//! [`GitError`] variants.
//!
//! # Error Handling
//!
//! - [`GitError::EmptyPath`]: no path was supplied to [`Repository::open`]
//! - [`GitError::OpenFailed`]: libgit2 could not open the path
//! - [`GitError::IterationFailed`]: a reference or branch iterator failed
//! - [`GitError::RevisionNotFound`]: a revision specifier did not resolve
//! - [`GitError::ObjectNotFound`]: an id did not name a commit
//!
//! "No HEAD" and "no branches" are not errors; they surface as `None` and
//! empty vectors.
//!
//! # Example
//!
//! ```ignore
//! use repolens::git::Repository;
//!
//! let repo = Repository::open("/srv/git/project.git")?;
//! let oid = repo.resolve("master~2")?;
//! println!("master~2 is {}", oid.short(7));
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{BranchScope, Commit, Oid, Signature};

/// Errors from repository store operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// An empty repository path was supplied.
    #[error("repository path can not be empty")]
    EmptyPath,

    /// The path could not be opened as a repository.
    #[error("failed to open repository at {path}: {message}")]
    OpenFailed {
        /// The path that was opened
        path: PathBuf,
        /// libgit2's description of the failure
        message: String,
    },

    /// A reference or branch iterator could not be created or advanced.
    #[error("reference iteration failed: {message}")]
    IterationFailed {
        /// Description of the failure
        message: String,
    },

    /// A revision specifier could not be parsed or located.
    #[error("revision not found: {spec}")]
    RevisionNotFound {
        /// The specifier as supplied by the caller
        spec: String,
    },

    /// An id did not resolve to a commit object.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The id that was looked up
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    fn iteration(err: git2::Error) -> Self {
        GitError::IterationFailed {
            message: err.message().to_string(),
        }
    }

    fn internal(err: git2::Error, context: &str) -> Self {
        GitError::Internal {
            message: format!("{}: {}", context, err.message()),
        }
    }
}

/// A handle to one repository on disk.
///
/// Each handle wraps exactly one libgit2 repository. There is no
/// process-wide client: callers serving several repositories open one
/// handle per repository and pass it to every operation.
pub struct Repository {
    repo: git2::Repository,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Repository {
    // =========================================================================
    // Opening and Probes
    // =========================================================================

    /// Open the repository at exactly `path`.
    ///
    /// Unlike discovery, no parent directories are searched: a hosting
    /// service always knows the absolute path of the bare repository it
    /// serves, e.g. `/srv/git/project.git`.
    ///
    /// # Errors
    ///
    /// - [`GitError::EmptyPath`] if `path` is empty
    /// - [`GitError::OpenFailed`] if libgit2 cannot open the path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(GitError::EmptyPath);
        }

        let repo = git2::Repository::open(path).map_err(|e| GitError::OpenFailed {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        tracing::debug!(path = %repo.path().display(), bare = repo.is_bare(), "opened repository");
        Ok(Self { repo })
    }

    /// Check whether `path` can be opened as a repository.
    pub fn exists(path: impl AsRef<Path>) -> bool {
        Self::open(path).is_ok()
    }

    /// The repository's git directory.
    ///
    /// For a bare repository this is the repository root itself.
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// The repository name: the last path component with `.git` stripped.
    ///
    /// For a non-bare repository the name of the working directory is used.
    pub fn name(&self) -> String {
        let dir = if self.repo.is_bare() {
            self.repo.path()
        } else {
            self.repo.workdir().unwrap_or_else(|| self.repo.path())
        };

        let last = dir
            .components()
            .next_back()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default();

        last.strip_suffix(".git").unwrap_or(&last).to_string()
    }

    /// Check if the repository has no working directory.
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    /// Check if the repository has no commits yet.
    pub fn is_empty(&self) -> Result<bool, GitError> {
        self.repo
            .is_empty()
            .map_err(|e| GitError::internal(e, "is_empty"))
    }

    /// Check if the repository has at least one commit.
    pub fn has_commits(&self) -> Result<bool, GitError> {
        Ok(!self.is_empty()?)
    }

    // =========================================================================
    // Ref Enumeration
    // =========================================================================

    /// List the full names of every reference, in store order.
    ///
    /// References whose names are not valid UTF-8 are skipped.
    ///
    /// # Errors
    ///
    /// - [`GitError::IterationFailed`] if the iterator fails
    pub fn reference_names(&self) -> Result<Vec<String>, GitError> {
        let refs = self.repo.references().map_err(GitError::iteration)?;

        let mut names = Vec::new();
        for reference in refs {
            let reference = reference.map_err(GitError::iteration)?;
            if let Some(name) = reference.name() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// List branch shorthand names for `scope`, in store order.
    ///
    /// Local branches are reported as `main`; remote-tracking branches as
    /// `origin/main`.
    ///
    /// # Errors
    ///
    /// - [`GitError::IterationFailed`] if the iterator fails
    pub fn branch_names(&self, scope: BranchScope) -> Result<Vec<String>, GitError> {
        let filter = match scope {
            BranchScope::Local => Some(git2::BranchType::Local),
            BranchScope::All => None,
        };

        let branches = self.repo.branches(filter).map_err(GitError::iteration)?;

        let mut names = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(GitError::iteration)?;
            // Skip non-UTF8 names
            if let Some(name) = branch.name().ok().flatten() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// Get the full name of the reference HEAD points at.
    ///
    /// Returns `refs/heads/<branch>` when on a branch and `HEAD` when
    /// detached. Returns `None` when HEAD is unborn (no commits yet, or it
    /// names a branch that does not exist) or missing.
    ///
    /// # Errors
    ///
    /// Any other lookup failure is returned as [`GitError::Internal`].
    pub fn head_ref_name(&self) -> Result<Option<String>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(None)
            }
            Err(e) => return Err(GitError::internal(e, "HEAD")),
        };

        Ok(head.name().map(String::from))
    }

    // =========================================================================
    // Revision Resolution
    // =========================================================================

    /// Resolve a revision specifier to an object id.
    ///
    /// Accepts everything libgit2's revparse grammar does: branch and tag
    /// names, short and full ids, `HEAD`, and relative expressions such as
    /// `main~3` or `HEAD^2`. The id of the named object is returned as-is;
    /// annotated tags are not peeled.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if the specifier is malformed,
    ///   ambiguous, or names nothing
    pub fn resolve(&self, spec: &str) -> Result<Oid, GitError> {
        let object = self.repo.revparse_single(spec).map_err(|e| {
            tracing::debug!(spec, error = e.message(), "revparse failed");
            GitError::RevisionNotFound {
                spec: spec.to_string(),
            }
        })?;

        Ok(object.id().into())
    }

    // =========================================================================
    // Commit Hydration
    // =========================================================================

    /// Look up `id` and hydrate it into a [`Commit`].
    ///
    /// `id` is parsed with the revparse grammar, so full and abbreviated ids
    /// both work; tags are peeled to the commit they point at.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if `id` does not name a commit
    pub fn commit(&self, id: &str) -> Result<Commit, GitError> {
        let not_found = || GitError::ObjectNotFound { oid: id.to_string() };

        let object = self.repo.revparse_single(id).map_err(|_| not_found())?;
        let commit = object.peel_to_commit().map_err(|_| not_found())?;

        Ok(hydrate(&commit))
    }

    /// List commits reachable from `to` but not from `from`.
    ///
    /// Ordered newest first in topological order. Merge commits are included.
    pub fn range_oids(&self, from: &Oid, to: &Oid) -> Result<Vec<Oid>, GitError> {
        let from_oid = to_git2(from)?;
        let to_oid = to_git2(to)?;

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| GitError::internal(e, "revwalk"))?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(|e| GitError::internal(e, "revwalk"))?;
        revwalk
            .push(to_oid)
            .map_err(|e| GitError::internal(e, to.as_str()))?;
        revwalk
            .hide(from_oid)
            .map_err(|e| GitError::internal(e, from.as_str()))?;

        let mut oids = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| GitError::internal(e, "revwalk"))?;
            oids.push(oid.into());
        }

        Ok(oids)
    }
}

fn to_git2(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|_| GitError::InvalidOid {
        oid: oid.to_string(),
    })
}

fn signature(sig: &git2::Signature<'_>) -> Signature {
    let time = chrono::DateTime::from_timestamp(sig.when().seconds(), 0)
        .unwrap_or(chrono::DateTime::UNIX_EPOCH);

    Signature {
        name: sig.name().unwrap_or("").to_string(),
        email: sig.email().unwrap_or("").to_string(),
        time,
    }
}

fn hydrate(commit: &git2::Commit<'_>) -> Commit {
    Commit {
        oid: commit.id().into(),
        parents: commit.parent_ids().map(Oid::from).collect(),
        summary: commit.summary().unwrap_or("").to_string(),
        message: commit.message().unwrap_or("").to_string(),
        author: signature(&commit.author()),
        committer: signature(&commit.committer()),
    }
}
