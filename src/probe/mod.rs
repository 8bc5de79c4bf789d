//! probe
//!
//! Repository disk usage.
//!
//! The size is measured by `du -sk` over the repository's git directory and
//! reported in megabytes with exactly two decimals, e.g. `"12.34"`.

use std::path::Path;

use thiserror::Error;

use crate::git::Repository;
use crate::process::{self, ProcessError};

/// Errors from the size probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The leading field of the output was not a number.
    #[error("could not parse disk usage from {input:?}")]
    Parse { input: String },
}

/// Report the on-disk size of `repo` in megabytes.
///
/// `du_binary` is a name on `PATH` or an absolute path.
///
/// # Errors
///
/// - [`ProcessError::Spawn`] if `du` cannot be started
/// - [`ProcessError::Exit`] if it exits non-zero
/// - [`ProbeError::Parse`] if its output does not start with a number
pub fn size(repo: &Repository, du_binary: impl AsRef<Path>) -> Result<String, ProbeError> {
    size_of_path(repo.path(), du_binary)
}

/// Report the on-disk size of `path` in megabytes.
pub fn size_of_path(path: &Path, du_binary: impl AsRef<Path>) -> Result<String, ProbeError> {
    let mut command = process::command(du_binary.as_ref(), ["-sk"]);
    command.arg(path);

    let output = process::capture(command)?;
    let kilobytes = parse_du_kilobytes(&output)?;
    Ok(format_megabytes(kilobytes))
}

/// Parse the kilobyte count from `du -sk` output.
///
/// Only the text before the first tab is considered.
///
/// # Example
///
/// ```
/// use repolens::probe::parse_du_kilobytes;
///
/// assert_eq!(parse_du_kilobytes("2048\t/srv/git/project.git\n").unwrap(), 2048.0);
/// assert!(parse_du_kilobytes("du: cannot access").is_err());
/// ```
pub fn parse_du_kilobytes(output: &str) -> Result<f64, ProbeError> {
    let field = output.split('\t').next().unwrap_or("").trim();
    match field.parse::<f64>() {
        Ok(kb) if kb.is_finite() => Ok(kb),
        _ => Err(ProbeError::Parse {
            input: field.to_string(),
        }),
    }
}

/// Convert kilobytes to megabytes with two decimals.
pub fn format_megabytes(kilobytes: f64) -> String {
    format!("{:.2}", kilobytes / 1024.0)
}
