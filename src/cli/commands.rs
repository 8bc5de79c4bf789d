//! cli::commands
//!
//! One handler per subcommand. Handlers open nothing themselves; they get
//! the repository handle and merged configuration from [`super::run`].

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::args::Command;
use crate::archive::{archive_file_path, ArchiveFormat};
use crate::core::config::Config;
use crate::core::types::{BranchScope, Commit};
use crate::git::Repository;
use crate::history::{self, GitLogSource, HistoryWalker, LogQuery};
use crate::{probe, refs};

/// Everything a handler needs.
pub struct Context<'a> {
    pub repo: &'a Repository,
    pub config: &'a Config,
    pub json: bool,
}

impl Context<'_> {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        emit(self.json, value, text)
    }

    fn emit_lines(&self, lines: &[String]) -> Result<()> {
        self.emit(&lines, || lines.join("\n"))
    }

    fn emit_commits(&self, commits: &[Commit]) -> Result<()> {
        self.emit(&commits, || {
            commits
                .iter()
                .map(|c| format!("{} {}", c.oid.short(7), c.summary))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let text = text();
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}

/// Print where the archive `name` would be stored. Needs no repository.
pub fn print_archive_path(name: &str, storage: &Path, format: &str, json: bool) -> Result<()> {
    let path = archive_file_path(name, storage, ArchiveFormat::from_name(format));
    let path = path.display().to_string();
    emit(json, &path, || path.clone())
}

#[derive(Serialize)]
struct Info {
    path: String,
    name: String,
    bare: bool,
    empty: bool,
    default_branch: String,
}

/// Dispatch a parsed command.
pub fn dispatch(command: Command, ctx: &Context<'_>) -> Result<()> {
    let repo = ctx.repo;
    let scope = ctx.config.branch_scope();

    match command {
        Command::Branches { local } => {
            let scope = if local { BranchScope::Local } else { scope };
            ctx.emit_lines(&refs::list_branches(repo, scope)?)
        }

        Command::Tags => ctx.emit_lines(&refs::list_tags(repo)?),

        Command::DefaultBranch => {
            let branch = refs::default_branch(repo, scope)?;
            ctx.emit(&branch, || branch.clone())
        }

        Command::Resolve { spec } => {
            let oid = repo.resolve(&spec)?;
            ctx.emit(&oid, || oid.to_string())
        }

        Command::Log {
            rev,
            limit,
            offset,
            follow,
            no_merges,
            path,
        } => {
            let start = match rev {
                Some(rev) => rev,
                None => refs::default_branch(repo, scope)?,
            };

            let mut query = LogQuery::new(start)
                .limit(limit.unwrap_or_else(|| ctx.config.log_limit()))
                .offset(offset)
                .follow_renames(follow)
                .skip_merges(no_merges || ctx.config.skip_merges());
            if let Some(path) = path {
                query = query.path(path);
            }

            let walker =
                HistoryWalker::with_source(repo, GitLogSource::new(ctx.config.git_binary()));
            match walker.walk(&query) {
                Ok(commits) => ctx.emit_commits(&commits),
                Err(failure) => {
                    // Show what was read before the failure, then fail
                    if !failure.commits.is_empty() {
                        ctx.emit_commits(&failure.commits)?;
                    }
                    Err(failure).context("log incomplete")
                }
            }
        }

        Command::Between { from, to } => {
            let commits = history::commits_between(repo, &from, &to)
                .with_context(|| format!("cannot list {}..{}", from, to))?;
            ctx.emit_commits(&commits)
        }

        Command::Size => {
            let size = probe::size(repo, ctx.config.du_binary())?;
            ctx.emit(&size, || size.clone())
        }

        Command::Info => {
            let info = Info {
                path: repo.path().display().to_string(),
                name: repo.name(),
                bare: repo.is_bare(),
                empty: repo.is_empty()?,
                default_branch: refs::default_branch(repo, scope)?,
            };
            ctx.emit(&info, || {
                format!(
                    "path: {}\nname: {}\nbare: {}\nempty: {}\ndefault branch: {}",
                    info.path, info.name, info.bare, info.empty, info.default_branch
                )
            })
        }

        Command::ArchivePath {
            name,
            storage,
            format,
        } => print_archive_path(&name, &storage, &format, ctx.json),
    }
}
