//! history::source
//!
//! Pluggable producers of commit ids for the history walker.
//!
//! # Design
//!
//! The walker never traverses the commit graph itself. It hands a
//! [`HistoryRequest`] to a [`HistorySource`] and reads back a stream of
//! commit ids, one per item. [`GitLogSource`] fulfils this by running
//! `git log`; a native graph walk can replace it without touching the
//! walker.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{HistoryError, LogQuery};
use crate::core::types::Oid;
use crate::process::{self, LineStream};

/// Everything a source needs to enumerate one page of history.
#[derive(Debug, Clone, Copy)]
pub struct HistoryRequest<'a> {
    /// The repository's git directory
    pub git_dir: &'a Path,
    /// The already-resolved starting point
    pub start: &'a Oid,
    /// Paging and filtering options
    pub query: &'a LogQuery,
}

/// A stream of commit ids produced by a [`HistorySource`].
///
/// Items are raw lines; the walker trims them and skips blank ones.
pub trait IdStream: Iterator<Item = Result<String, HistoryError>> {
    /// Release the stream's resources and report any deferred failure.
    ///
    /// Must be safe to call after a partial read.
    fn finish(self: Box<Self>) -> Result<(), HistoryError>;
}

/// Producer of commit ids in reverse-chronological order.
pub trait HistorySource {
    /// Start enumerating ids for `request`.
    fn open(&self, request: HistoryRequest<'_>) -> Result<Box<dyn IdStream + '_>, HistoryError>;
}

/// [`HistorySource`] backed by `git log --format=%H`.
///
/// Ordering, paging and merge filtering are delegated to git, so pages
/// match what `git log` shows for the same options.
#[derive(Debug, Clone)]
pub struct GitLogSource {
    git_binary: PathBuf,
}

impl Default for GitLogSource {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitLogSource {
    /// Use `git_binary` (a name on `PATH` or an absolute path) to run `log`.
    pub fn new(git_binary: impl Into<PathBuf>) -> Self {
        Self {
            git_binary: git_binary.into(),
        }
    }

    /// Build the argument vector for `request`.
    ///
    /// `--follow` is only emitted together with a path: git refuses it
    /// without exactly one pathspec, and it has nothing to track otherwise.
    pub fn args(request: &HistoryRequest<'_>) -> Vec<OsString> {
        let query = request.query;

        let mut git_dir = OsString::from("--git-dir=");
        git_dir.push(request.git_dir);

        let mut args: Vec<OsString> = vec![
            git_dir,
            "log".into(),
            "-n".into(),
            query.limit.to_string().into(),
            "--format=%H".into(),
            format!("--skip={}", query.offset).into(),
        ];

        if query.follow_renames && query.path.is_some() {
            args.push("--follow".into());
        }
        if query.skip_merges {
            args.push("--no-merges".into());
        }

        args.push(request.start.as_str().into());

        if let Some(path) = &query.path {
            args.push("--".into());
            args.push(path.as_os_str().to_owned());
        }

        args
    }
}

impl HistorySource for GitLogSource {
    fn open(&self, request: HistoryRequest<'_>) -> Result<Box<dyn IdStream + '_>, HistoryError> {
        let command = process::command(&self.git_binary, Self::args(&request));
        let lines = LineStream::spawn(command)?;
        Ok(Box::new(GitLogStream(lines)))
    }
}

struct GitLogStream(LineStream);

impl Iterator for GitLogStream {
    type Item = Result<String, HistoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|line| line.map_err(HistoryError::from))
    }
}

impl IdStream for GitLogStream {
    fn finish(self: Box<Self>) -> Result<(), HistoryError> {
        self.0.finish().map_err(HistoryError::from)
    }
}
