//! process
//!
//! Scoped execution of external programs (`git log`, `du`).
//!
//! # Architecture
//!
//! Two entry points cover every external program this crate runs:
//!
//! - [`LineStream`] spawns a child and yields its stdout one line at a time.
//!   The whole output is never buffered, so very long histories stream in
//!   constant memory.
//! - [`capture`] runs a child to completion and returns its stdout, for
//!   programs whose output is a handful of bytes.
//!
//! # Invariants
//!
//! - A spawned child is always waited on, and its stdout drained, on every
//!   exit path. [`LineStream::finish`] does this explicitly; `Drop` does it
//!   best-effort when a caller bails out early.
//! - stderr is collected on its own thread from the moment of spawn, so a
//!   child can never stall on a full stderr pipe while stdout is read.
//! - A non-zero exit status is an error ([`ProcessError::Exit`]) carrying
//!   the child's stderr.

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use thiserror::Error;

/// Errors from running external programs.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("{program} exited with {}: {stderr}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    Exit {
        program: String,
        /// Exit code, `None` if terminated by a signal
        code: Option<i32>,
        /// Trimmed stderr output
        stderr: String,
    },

    /// Reading from or waiting on the program failed.
    #[error("I/O error talking to {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}

/// Read all of `pipe` on a background thread.
fn collect_stderr(mut pipe: ChildStderr) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        // A read error only loses diagnostics; the exit status still decides
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn check_status(program: &str, status: ExitStatus, stderr: &[u8]) -> Result<(), ProcessError> {
    if status.success() {
        return Ok(());
    }
    Err(ProcessError::Exit {
        program: program.to_string(),
        code: status.code(),
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    })
}

/// Run `command` to completion and return its stdout as (lossy) UTF-8.
///
/// # Errors
///
/// - [`ProcessError::Spawn`] if the program cannot be started
/// - [`ProcessError::Exit`] if it exits non-zero
pub fn capture(mut command: Command) -> Result<String, ProcessError> {
    let program = program_name(&command);
    tracing::debug!(program = %program, args = ?command.get_args().collect::<Vec<_>>(), "running");

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

    check_status(&program, output.status, &output.stderr)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Line-at-a-time view of a running child's stdout.
///
/// Iterating yields each line including its terminator; callers trim.
/// Call [`LineStream::finish`] to collect the exit status. Dropping the
/// stream without finishing still drains stdout and reaps the child.
///
/// # Example
///
/// ```no_run
/// use std::process::Command;
/// use repolens::process::LineStream;
///
/// let mut cmd = Command::new("git");
/// cmd.args(["log", "--format=%H"]);
/// let mut stream = LineStream::spawn(cmd)?;
/// for line in stream.by_ref() {
///     println!("{}", line?.trim());
/// }
/// stream.finish()?;
/// # Ok::<(), repolens::process::ProcessError>(())
/// ```
#[derive(Debug)]
pub struct LineStream {
    program: String,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<Vec<u8>>>,
}

impl LineStream {
    /// Spawn `command` with stdout and stderr piped.
    ///
    /// stderr is read concurrently and kept for the exit error.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::Spawn`] if the program cannot be started
    pub fn spawn(mut command: Command) -> Result<Self, ProcessError> {
        let program = program_name(&command);
        tracing::debug!(program = %program, args = ?command.get_args().collect::<Vec<_>>(), "spawning");

        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().map(BufReader::new);
        let stderr = child.stderr.take().map(collect_stderr);

        Ok(Self {
            program,
            child: Some(child),
            stdout,
            stderr,
        })
    }

    /// Drain any unread stdout, wait for the child and check its status.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::Io`] if draining or waiting fails
    /// - [`ProcessError::Exit`] if the child exited non-zero
    pub fn finish(mut self) -> Result<(), ProcessError> {
        let io_err = |program: &str, source| ProcessError::Io {
            program: program.to_string(),
            source,
        };

        if let Some(mut stdout) = self.stdout.take() {
            std::io::copy(&mut stdout, &mut std::io::sink())
                .map_err(|e| io_err(&self.program, e))?;
        }

        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait().map_err(|e| io_err(&self.program, e))?;
        let stderr = self
            .stderr
            .take()
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();
        check_status(&self.program, status, &stderr)
    }
}

impl Iterator for LineStream {
    type Item = Result<String, ProcessError>;

    fn next(&mut self) -> Option<Self::Item> {
        let stdout = self.stdout.as_mut()?;

        let mut line = String::new();
        match stdout.read_line(&mut line) {
            Ok(0) => {
                self.stdout = None;
                None
            }
            Ok(_) => Some(Ok(line)),
            Err(source) => {
                self.stdout = None;
                Some(Err(ProcessError::Io {
                    program: self.program.clone(),
                    source,
                }))
            }
        }
    }
}

impl Drop for LineStream {
    fn drop(&mut self) {
        // Best-effort cleanup: never leave a zombie or an open pipe behind
        if let Some(mut stdout) = self.stdout.take() {
            let _ = std::io::copy(&mut stdout, &mut std::io::sink());
        }
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        if let Some(reader) = self.stderr.take() {
            let _ = reader.join();
        }
    }
}

/// Build a `Command` for `program` with `args`.
pub fn command<I, S>(program: impl AsRef<OsStr>, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    command
}
