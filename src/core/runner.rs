//! External probe command execution.
//!
//! [`SystemRunner`] spawns probes with `tokio::process`, bounded by a timeout.
//! The child is killed when the future is dropped, so cancelling a refresh also
//! reaps a hung `dig`.

use std::fmt;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs a probe command and returns its textual output.
pub trait CommandRunner: Send + Sync + 'static {
    fn run(&self, command: &CommandSpec) -> impl Future<Output = Result<String, ResolveError>> + Send;
}

/// Runs probes as real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    /// Stdout followed by stderr. A non-zero exit status is not an error:
    /// tools like `ifconfig` report missing devices on stderr and the parser
    /// decides whether anything useful came back.
    fn run(&self, command: &CommandSpec) -> impl Future<Output = Result<String, ResolveError>> + Send {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let timeout = self.timeout;
        let label = command.to_string();

        async move {
            let output = match tokio::time::timeout(timeout, cmd.output()).await {
                Ok(result) => result?,
                Err(_) => return Err(ResolveError::Timeout(label)),
            };
            tracing::trace!(command = %label, status = ?output.status, "probe finished");

            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            Ok(text)
        }
    }
}
