//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--repo <path>`: Repository to inspect (default: current directory)
//! - `--debug`: Enable debug logging
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// repolens - read-only branch, revision and history introspection
#[derive(Parser, Debug)]
#[command(name = "repolens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the repository (bare or not)
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List branches
    Branches {
        /// Only local branches, regardless of configuration
        #[arg(long)]
        local: bool,
    },

    /// List tags
    Tags,

    /// Print the default branch (empty if there are no branches)
    DefaultBranch,

    /// Resolve a revision specifier to an object id
    Resolve {
        /// Branch, tag, object id, or expression such as `master~2`
        spec: String,
    },

    /// Show one page of commit history
    #[command(
        after_help = "\
EXAMPLES:
    # First ten non-merge commits on master
    repolens --repo /srv/git/project.git log master --limit 10 --no-merges

    # Second page
    repolens --repo /srv/git/project.git log master --limit 10 --offset 10

    # History of one file across renames
    repolens log --path src/lib.rs --follow"
    )]
    Log {
        /// Revision to start from (default: the default branch)
        rev: Option<String>,

        /// Maximum number of commits
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Number of commits to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Follow renames (requires --path)
        #[arg(long)]
        follow: bool,

        /// Exclude merge commits
        #[arg(long)]
        no_merges: bool,

        /// Only commits touching this path
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Commits reachable from <to> but not from <from>
    Between {
        from: String,
        to: String,
    },

    /// Print on-disk size in megabytes
    Size,

    /// Print repository facts (path, bare, empty, default branch)
    Info,

    /// Print the path an archive would be stored at
    ArchivePath {
        /// Archive name
        name: String,

        /// Archive storage directory
        storage: PathBuf,

        /// Format: tar.gz (default), tar.bz2, tar, zip
        #[arg(long, default_value = "")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_flags_parse() {
        let cli = Cli::try_parse_from([
            "repolens", "--repo", "/srv/x.git", "log", "master", "-n", "5", "--offset", "10",
            "--no-merges",
        ])
        .unwrap();

        assert_eq!(cli.repo, PathBuf::from("/srv/x.git"));
        match cli.command {
            Command::Log {
                rev,
                limit,
                offset,
                no_merges,
                follow,
                path,
            } => {
                assert_eq!(rev.as_deref(), Some("master"));
                assert_eq!(limit, Some(5));
                assert_eq!(offset, 10);
                assert!(no_merges);
                assert!(!follow);
                assert!(path.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn repo_defaults_to_cwd() {
        let cli = Cli::try_parse_from(["repolens", "tags"]).unwrap();
        assert_eq!(cli.repo, PathBuf::from("."));
        assert!(!cli.json);
    }
}
