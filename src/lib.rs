//! repolens - read-only introspection for bare git repositories
//!
//! repolens backs a hosting UI with the repository facts it needs: branch
//! and tag lists, a canonical default branch, resolved revisions, paginated
//! commit history, and disk usage. It never writes to the repository.
//!
//! # Architecture
//!
//! - [`git`] - The only doorway to libgit2 (open, refs, HEAD, revparse, commits)
//! - [`refs`] - Reference catalog and default-branch resolution
//! - [`history`] - Paginated history: resolve → enumerate ids → hydrate
//! - [`probe`] - Disk usage via `du`
//! - [`process`] - Scoped external process execution
//! - [`archive`] - Archive file path layout
//! - [`core`] - Domain types and configuration
//! - [`cli`] - Command-line front end
//!
//! # Handles, not globals
//!
//! Every operation takes a [`git::Repository`] handle explicitly. Serving
//! many repositories means opening many handles; nothing is shared between
//! them.
//!
//! # Example
//!
//! ```no_run
//! use repolens::core::types::BranchScope;
//! use repolens::git::Repository;
//! use repolens::history::{HistoryWalker, LogQuery};
//! use repolens::refs;
//!
//! let repo = Repository::open("/srv/git/project.git")?;
//! let branch = refs::default_branch(&repo, BranchScope::All)?;
//! let page = HistoryWalker::new(&repo).walk(&LogQuery::new(branch).limit(10))?;
//! for commit in page {
//!     println!("{} {}", commit.oid.short(7), commit.summary);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod cli;
pub mod core;
pub mod git;
pub mod history;
pub mod probe;
pub mod process;
pub mod refs;
