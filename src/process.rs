//! Command runner for external process execution.
//!
//! Both subprocess collaborators (whisper.cpp transcription and the ffmpeg
//! render) go through [`CommandRunner`], which captures stdout/stderr and turns
//! a nonzero exit into a [`ProcessError::Exit`] carrying the child's stderr.
//!
//! Children are spawned with `kill_on_drop`, so dropping the future returned by
//! [`CommandRunner::run`] (e.g. when a Ctrl-C branch wins a `select!`) also
//! terminates the child process.
//!
//! [`ctrl_c`] and [`until_interrupted`] are the shared Ctrl-C plumbing every
//! long-running step races against.

use std::ffi::OsStr;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

/// Errors raised while running an external program.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started at all (usually not on `PATH`).
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Captured output of a successful run.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs one external program to completion.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: PathBuf,
}

impl CommandRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this runner invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the program with `args` and wait for it to exit.
    pub async fn run<I, S>(&self, args: I) -> Result<CommandOutput, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self.program.display().to_string();
        log::debug!("exec: {program}");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(ProcessError::Exit {
                program,
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

// ---------------------------------------------------------------------------
// Interrupts
// ---------------------------------------------------------------------------

/// Resolves on Ctrl-C.  Never resolves if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Run `work` to completion unless `interrupt` resolves first, in which case
/// `work` is dropped and `None` is returned.
pub async fn until_interrupted<W, I>(work: W, interrupt: I) -> Option<W::Output>
where
    W: Future,
    I: Future<Output = ()>,
{
    tokio::select! {
        out = work => Some(out),
        _ = interrupt => None,
    }
}
