//! git
//!
//! Single interface for all repository store access.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to libgit2. Reference enumeration,
//! HEAD inspection, revision parsing and commit lookup all flow through
//! [`Repository`]. No other module should import `git2` for repository
//! access; history traversal that needs the `git` executable goes through
//! [`crate::history`] and [`crate::process`] instead.
//!
//! # Responsibilities
//!
//! - Opening a repository by exact path
//! - Reference and branch enumeration
//! - HEAD inspection (absent HEAD is not an error)
//! - Revision specifier resolution
//! - Commit hydration and two-dot range walks
//!
//! # Invariants
//!
//! - Read-only: nothing here writes to the repository
//! - All operations return strong types (`Oid`, `Commit`)
//!
//! # Example
//!
//! ```ignore
//! use repolens::git::Repository;
//! use repolens::core::types::BranchScope;
//!
//! let repo = Repository::open("/srv/git/project.git")?;
//! let branches = repo.branch_names(BranchScope::Local)?;
//! let tip = repo.resolve("master")?;
//! ```

mod interface;

pub use interface::{GitError, Repository};
