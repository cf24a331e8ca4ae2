//! Captured subprocess execution.
//!
//! Every check that spawns a program goes through [`run_captured`] or
//! [`run_combined`]: the program is started directly (no shell), its
//! output is captured and the caller decides what a non-zero exit means.
//! [`run_combined`] sends both streams into one pipe so the output keeps
//! the order the program wrote it in.

use crate::error::{CheckError, Result};
use std::ffi::OsStr;
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// Result of running a program to completion.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// How the program exited.
    pub status: ExitStatus,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,
}

impl CapturedOutput {
    /// Whether the program exited with code 0.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Standard output followed by standard error.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }

    /// The exit status as a display string (e.g. "exit status: 1").
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }
}

/// Run `program` with `args`, capturing both output streams.
///
/// Fails with [`CheckError::CommandLaunch`] only when the program cannot
/// be started; a non-zero exit is reported through the returned status.
pub fn run_captured<P, I, S>(program: P, args: I) -> Result<CapturedOutput>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Running {:?}", cmd);

    let output = cmd.output().map_err(|source| CheckError::CommandLaunch {
        command: program.to_string_lossy().into_owned(),
        source,
    })?;

    let captured = CapturedOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: start.elapsed(),
    };

    tracing::debug!(
        "{} finished with {} in {:?}",
        program.to_string_lossy(),
        captured.status,
        captured.duration
    );

    Ok(captured)
}

/// Result of running a program with stdout and stderr merged.
#[derive(Debug, Clone)]
pub struct CombinedOutput {
    /// How the program exited.
    pub status: ExitStatus,

    /// Both streams, interleaved as written.
    pub output: String,

    /// Execution duration.
    pub duration: Duration,
}

impl CombinedOutput {
    /// Whether the program exited with code 0.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// The exit status as a display string (e.g. "exit status: 1").
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }
}

/// Run `program` with `args`, capturing stdout and stderr through a single
/// pipe.
///
/// Fails with [`CheckError::CommandLaunch`] when the program cannot be
/// started, and with [`CheckError::Io`] when its output cannot be read.
pub fn run_combined<P, I, S>(program: P, args: I) -> Result<CombinedOutput>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let start = Instant::now();

    let (mut reader, writer) =
        std::io::pipe().map_err(|e| CheckError::io("Problem creating an output pipe", e))?;
    let stderr = writer
        .try_clone()
        .map_err(|e| CheckError::io("Problem creating an output pipe", e))?;

    // The Command owns the parent's copies of the write end; it must be
    // dropped before reading or the pipe never reaches EOF.
    let mut child = {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(writer);
        cmd.stderr(stderr);

        tracing::debug!("Running {:?}", cmd);

        cmd.spawn().map_err(|source| CheckError::CommandLaunch {
            command: program.to_string_lossy().into_owned(),
            source,
        })?
    };

    let mut raw = Vec::new();
    let read = reader.read_to_end(&mut raw);
    let status = child.wait().map_err(|e| {
        CheckError::io(format!("Problem waiting for {}", program.to_string_lossy()), e)
    })?;
    read.map_err(|e| {
        CheckError::io(format!("Problem reading output of {}", program.to_string_lossy()), e)
    })?;

    let combined = CombinedOutput {
        status,
        output: String::from_utf8_lossy(&raw).into_owned(),
        duration: start.elapsed(),
    };

    tracing::debug!(
        "{} finished with {} in {:?}",
        program.to_string_lossy(),
        combined.status,
        combined.duration
    );

    Ok(combined)
}
