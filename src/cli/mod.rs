//! cli
//!
//! Command-line front end.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Open the repository and load configuration once, then delegate to a
//!   command handler
//!
//! The CLI is thin and read-only. Everything it prints comes from the
//! library modules; it adds formatting only.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::git::Repository;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    if let Command::ArchivePath {
        name,
        storage,
        format,
    } = &cli.command
    {
        return commands::print_archive_path(name, storage, format, cli.json);
    }

    let repo = Repository::open(&cli.repo)
        .with_context(|| format!("cannot open repository {}", cli.repo.display()))?;
    let config = Config::load(Some(repo.path())).context("cannot load configuration")?;

    let ctx = commands::Context {
        repo: &repo,
        config: &config,
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Send logs to stderr.
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects `debug` for this
/// crate and everything else stays at `warn`.
fn init_tracing(debug: bool) {
    let default = if debug { "warn,repolens=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
