//! Child process invocation.
//!
//! [`CommandRunner`] is the seam between the adapter and the operating
//! system. [`SystemRunner`] spawns real processes via `tokio::process`;
//! tests substitute a scripted runner.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use crate::error::ClientError;

/// A program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Wraps `program args...` with a privilege elevation command
    /// (`pkexec program args...`). An empty wrapper runs the command as-is.
    pub fn elevated<I, S>(wrapper: &str, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inner = Self::new(program, args);
        let wrapper = wrapper.trim();
        if wrapper.is_empty() {
            return inner;
        }

        let mut args = Vec::with_capacity(inner.args.len() + 1);
        args.push(inner.program);
        args.extend(inner.args);
        Self {
            program: wrapper.to_string(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Whether the process exited with status 0. Informational only;
    /// failure is signalled by stderr content.
    pub success: bool,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stdout: text.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// Failed output with the given stderr.
    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: text.into(),
            success: false,
        }
    }

    /// Returns `true` if the process wrote anything besides whitespace to stderr.
    pub fn has_stderr(&self) -> bool {
        !self.stderr.trim().is_empty()
    }
}

/// Boxed future returned by [`CommandRunner::run`].
pub type RunFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CommandOutput, ClientError>> + Send + 'a>>;

/// Runs external commands to completion.
///
/// Implementations must not apply timeouts or retries; a hung child
/// blocks the caller.
pub trait CommandRunner: Send + Sync {
    /// Runs `invocation` and captures its output. Errors only when the
    /// process cannot be spawned.
    fn run<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a>;
}

/// Spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a> {
        Box::pin(async move {
            tracing::debug!(command = %invocation, "running command");

            let output = tokio::process::Command::new(&invocation.program)
                .args(&invocation.args)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|source| ClientError::Spawn {
                    command: invocation.to_string(),
                    source,
                })?;

            let output = CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                success: output.status.success(),
            };

            tracing::trace!(
                command = %invocation,
                success = output.success,
                stdout_len = output.stdout.len(),
                stderr_len = output.stderr.len(),
                "command finished"
            );

            Ok(output)
        })
    }
}
