//! history
//!
//! Paginated commit history for a single starting revision.
//!
//! # Pipeline
//!
//! 1. Resolve the starting revision through [`Repository::resolve`]. An
//!    unknown revision fails here, before anything is spawned.
//! 2. Ask a [`HistorySource`] for commit ids (default: `git log`), with
//!    paging, merge filtering and rename following applied by the source.
//! 3. Hydrate each id into a [`Commit`] through the same repository handle,
//!    one line at a time. Output is never buffered in full.
//!
//! # Partial Results
//!
//! If hydration or the source fails mid-stream, the walk stops and returns a
//! [`WalkFailure`] carrying every commit hydrated so far alongside the error.
//! Nothing already read is discarded.
//!
//! # Example
//!
//! ```ignore
//! use repolens::git::Repository;
//! use repolens::history::{HistoryWalker, LogQuery};
//!
//! let repo = Repository::open("/srv/git/project.git")?;
//! let walker = HistoryWalker::new(&repo);
//! let page = walker.walk(&LogQuery::new("master").limit(10).skip_merges(true))?;
//! ```

mod source;

pub use source::{GitLogSource, HistoryRequest, HistorySource, IdStream};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::Commit;
use crate::git::{GitError, Repository};
use crate::process::ProcessError;

/// Page size used when a caller does not pick one.
pub const DEFAULT_LIMIT: usize = 20;

/// Errors that can stop a history walk.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// A walk that stopped early.
///
/// `commits` holds everything hydrated before `source` occurred, in walk
/// order. It is empty when the start revision did not resolve.
#[derive(Debug, Error)]
#[error("history walk stopped after {} commits: {source}", .commits.len())]
pub struct WalkFailure {
    pub commits: Vec<Commit>,
    pub source: HistoryError,
}

impl WalkFailure {
    fn before_start(source: impl Into<HistoryError>) -> Self {
        Self {
            commits: Vec::new(),
            source: source.into(),
        }
    }

    /// Check if the walk failed because its start revision did not resolve.
    pub fn is_revision_not_found(&self) -> bool {
        matches!(
            self.source,
            HistoryError::Git(GitError::RevisionNotFound { .. })
        )
    }
}

/// Options for one page of history.
///
/// # Example
///
/// ```
/// use repolens::history::LogQuery;
///
/// let query = LogQuery::new("master").limit(10).offset(20).skip_merges(true);
/// assert_eq!(query.limit, 10);
/// assert_eq!(query.offset, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Revision specifier to start from
    pub start: String,
    /// Maximum number of commits to return
    pub limit: usize,
    /// Number of commits to skip before the first returned one
    pub offset: usize,
    /// Follow renames of `path` (ignored without a path)
    pub follow_renames: bool,
    /// Exclude commits with more than one parent
    pub skip_merges: bool,
    /// Restrict history to commits touching this path
    pub path: Option<PathBuf>,
}

impl LogQuery {
    /// A first page of [`DEFAULT_LIMIT`] commits starting at `start`.
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            follow_renames: false,
            skip_merges: false,
            path: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn follow_renames(mut self, follow: bool) -> Self {
        self.follow_renames = follow;
        self
    }

    pub fn skip_merges(mut self, skip: bool) -> Self {
        self.skip_merges = skip;
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Walks history for one repository through a [`HistorySource`].
#[derive(Debug)]
pub struct HistoryWalker<'r, S = GitLogSource> {
    repo: &'r Repository,
    source: S,
}

impl<'r> HistoryWalker<'r, GitLogSource> {
    /// Walker that runs `git` from `PATH`.
    pub fn new(repo: &'r Repository) -> Self {
        Self::with_source(repo, GitLogSource::default())
    }
}

impl<'r, S: HistorySource> HistoryWalker<'r, S> {
    /// Walker that reads ids from `source`.
    pub fn with_source(repo: &'r Repository, source: S) -> Self {
        Self { repo, source }
    }

    /// Return one page of commits for `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`WalkFailure`] holding the commits hydrated so far and the
    /// error that stopped the walk:
    /// - `GitError::RevisionNotFound` if `query.start` does not resolve
    /// - `GitError::ObjectNotFound` if an emitted id cannot be hydrated
    /// - `ProcessError` if the source cannot be spawned, read, or exits
    ///   non-zero
    pub fn walk(&self, query: &LogQuery) -> Result<Vec<Commit>, WalkFailure> {
        let start = self
            .repo
            .resolve(&query.start)
            .map_err(WalkFailure::before_start)?;

        tracing::debug!(
            start = %query.start,
            oid = %start,
            limit = query.limit,
            offset = query.offset,
            skip_merges = query.skip_merges,
            "walking history"
        );

        let request = HistoryRequest {
            git_dir: self.repo.path(),
            start: &start,
            query,
        };
        let mut stream = self
            .source
            .open(request)
            .map_err(WalkFailure::before_start)?;

        let mut commits = Vec::new();
        loop {
            let line = match stream.next() {
                None => break,
                Some(Ok(line)) => line,
                Some(Err(e)) => return Err(abort(stream, commits, e)),
            };

            let id = line.trim();
            if id.is_empty() {
                continue;
            }

            match self.repo.commit(id) {
                Ok(commit) => commits.push(commit),
                Err(e) => return Err(abort(stream, commits, e.into())),
            }
        }

        if let Err(e) = stream.finish() {
            return Err(WalkFailure { commits, source: e });
        }

        Ok(commits)
    }
}

/// Release `stream` and package what was hydrated so far.
fn abort(stream: Box<dyn IdStream + '_>, commits: Vec<Commit>, source: HistoryError) -> WalkFailure {
    tracing::warn!(hydrated = commits.len(), error = %source, "history walk aborted");
    if let Err(e) = stream.finish() {
        tracing::debug!(error = %e, "history source failed during cleanup");
    }
    WalkFailure { commits, source }
}

/// Commits reachable from `to` but not from `from` (`from..to`).
///
/// Newest first in topological order; merges included; `to` is included
/// and `from` is not.
///
/// # Errors
///
/// - `GitError::RevisionNotFound` if either side does not resolve
pub fn commits_between(repo: &Repository, from: &str, to: &str) -> Result<Vec<Commit>, GitError> {
    let from = repo.resolve(from)?;
    let to = repo.resolve(to)?;

    repo.range_oids(&from, &to)?
        .iter()
        .map(|oid| repo.commit(oid.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::process::Command;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Source that replays canned lines and records whether it was finished.
    struct ScriptedSource {
        lines: Vec<Result<String, ()>>,
        finished: Rc<Cell<bool>>,
        opened: Rc<Cell<bool>>,
    }

    impl ScriptedSource {
        fn new(lines: Vec<Result<String, ()>>) -> Self {
            Self {
                lines,
                finished: Rc::new(Cell::new(false)),
                opened: Rc::new(Cell::new(false)),
            }
        }
    }

    struct ScriptedStream {
        lines: std::vec::IntoIter<Result<String, ()>>,
        finished: Rc<Cell<bool>>,
    }

    impl Iterator for ScriptedStream {
        type Item = Result<String, HistoryError>;

        fn next(&mut self) -> Option<Self::Item> {
            self.lines.next().map(|line| {
                line.map_err(|()| {
                    HistoryError::Process(ProcessError::Io {
                        program: "scripted".into(),
                        source: std::io::Error::other("broken pipe"),
                    })
                })
            })
        }
    }

    impl IdStream for ScriptedStream {
        fn finish(self: Box<Self>) -> Result<(), HistoryError> {
            self.finished.set(true);
            Ok(())
        }
    }

    impl HistorySource for ScriptedSource {
        fn open(&self, _request: HistoryRequest<'_>) -> Result<Box<dyn IdStream + '_>, HistoryError> {
            self.opened.set(true);
            Ok(Box::new(ScriptedStream {
                lines: self.lines.clone().into_iter(),
                finished: Rc::clone(&self.finished),
            }))
        }
    }

    fn run_git(dir: &std::path::Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("git command failed");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    /// A repository with three linear commits; returns (dir, oids newest first).
    fn linear_repo() -> (TempDir, Vec<String>) {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "-q", "-b", "master"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        let mut oids = Vec::new();
        for i in 0..3 {
            run_git(
                dir.path(),
                &["commit", "-q", "--allow-empty", "-m", &format!("commit {i}")],
            );
            oids.push(run_git(dir.path(), &["rev-parse", "HEAD"]));
        }
        oids.reverse();
        (dir, oids)
    }

    #[test]
    fn hydrates_every_line_in_order() {
        let (dir, oids) = linear_repo();
        let repo = Repository::open(dir.path()).unwrap();
        let source = ScriptedSource::new(oids.iter().map(|o| Ok(format!("  {o}\n"))).collect());
        let finished = Rc::clone(&source.finished);

        let walker = HistoryWalker::with_source(&repo, source);
        let commits = walker.walk(&LogQuery::new("master")).unwrap();

        let got: Vec<&str> = commits.iter().map(|c| c.oid.as_str()).collect();
        assert_eq!(got, oids.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(finished.get());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (dir, oids) = linear_repo();
        let repo = Repository::open(dir.path()).unwrap();
        let source = ScriptedSource::new(vec![
            Ok("\n".into()),
            Ok(format!("{}\n", oids[0])),
            Ok("   \n".into()),
        ]);

        let commits = HistoryWalker::with_source(&repo, source)
            .walk(&LogQuery::new("master"))
            .unwrap();
        assert_eq!(commits.len(), 1);
    }

    #[test]
    fn unresolvable_line_returns_partial_result() {
        let (dir, oids) = linear_repo();
        let repo = Repository::open(dir.path()).unwrap();
        let source = ScriptedSource::new(vec![
            Ok(format!("{}\n", oids[0])),
            Ok(format!("{}\n", oids[1])),
            Ok("0123456789012345678901234567890123456789\n".into()),
            Ok(format!("{}\n", oids[2])),
        ]);
        let finished = Rc::clone(&source.finished);

        let failure = HistoryWalker::with_source(&repo, source)
            .walk(&LogQuery::new("master"))
            .unwrap_err();

        assert_eq!(failure.commits.len(), 2);
        assert_eq!(failure.commits[1].oid.as_str(), oids[1]);
        assert!(matches!(
            failure.source,
            HistoryError::Git(GitError::ObjectNotFound { .. })
        ));
        assert!(finished.get(), "stream must be released on abort");
    }

    #[test]
    fn stream_error_returns_partial_result() {
        let (dir, oids) = linear_repo();
        let repo = Repository::open(dir.path()).unwrap();
        let source = ScriptedSource::new(vec![Ok(format!("{}\n", oids[0])), Err(())]);

        let failure = HistoryWalker::with_source(&repo, source)
            .walk(&LogQuery::new("master"))
            .unwrap_err();

        assert_eq!(failure.commits.len(), 1);
        assert!(matches!(failure.source, HistoryError::Process(_)));
        assert!(failure.to_string().contains("after 1 commits"));
    }

    #[test]
    fn unknown_start_fails_before_opening_source() {
        let (dir, _) = linear_repo();
        let repo = Repository::open(dir.path()).unwrap();
        let source = ScriptedSource::new(Vec::new());
        let opened = Rc::clone(&source.opened);

        let failure = HistoryWalker::with_source(&repo, source)
            .walk(&LogQuery::new("no-such-branch"))
            .unwrap_err();

        assert!(failure.is_revision_not_found());
        assert!(failure.commits.is_empty());
        assert!(!opened.get());
    }

    #[test]
    fn commits_between_linear_range() {
        let (dir, oids) = linear_repo();
        let repo = Repository::open(dir.path()).unwrap();

        let commits = commits_between(&repo, &oids[2], "master").unwrap();
        let got: Vec<&str> = commits.iter().map(|c| c.oid.as_str()).collect();
        assert_eq!(got, vec![oids[0].as_str(), oids[1].as_str()]);

        assert!(commits_between(&repo, "master", "master").unwrap().is_empty());
    }

    #[test]
    fn commits_between_unknown_side() {
        let (dir, _) = linear_repo();
        let repo = Repository::open(dir.path()).unwrap();
        let err = commits_between(&repo, "nope", "master").unwrap_err();
        assert!(matches!(err, GitError::RevisionNotFound { .. }));
    }

    #[test]
    fn query_builder_defaults() {
        let query = LogQuery::new("main");
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.offset, 0);
        assert!(!query.follow_renames);
        assert!(!query.skip_merges);
        assert!(query.path.is_none());
    }
}
