//! Answers produced by an external program

use super::Responder;
use crate::{Error, Result};
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Default cap on a program's standard output (1 MB)
pub const DEFAULT_MAX_OUTPUT: usize = 1024 * 1024;

/// Runs a program once per query and answers with its standard output
///
/// Trailing line breaks are stripped so that `fortune`-style tools render
/// as a single cell. A spawn failure, a non-zero exit status, or output
/// larger than [`CommandResponder::max_output`] is a responder error.
#[derive(Debug, Clone)]
pub struct CommandResponder {
    program: String,
    args: Vec<String>,
    max_output: usize,
}

impl CommandResponder {
    /// Run `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            max_output: DEFAULT_MAX_OUTPUT,
        }
    }

    /// Limit how many bytes of output are accepted
    ///
    /// Default: 1 MB. The program is killed once it writes past the limit.
    pub fn max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Parse a whitespace-separated command line (`"fortune -s"`)
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Config("responder command must not be empty".into()))?;
        Ok(parts.fold(Self::new(program), |cmd, arg| cmd.arg(arg)))
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    async fn run(&self) -> Result<Bytes> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::responder(format!("failed to run {}: {}", self.program, e)))?;

        let mut stdout = Vec::new();
        if let Some(out) = child.stdout.take() {
            // One byte past the limit is enough to tell it was exceeded.
            out.take((self.max_output as u64).saturating_add(1))
                .read_to_end(&mut stdout)
                .await
                .map_err(|e| {
                    Error::responder(format!("failed to read output of {}: {}", self.program, e))
                })?;
        }
        if stdout.len() > self.max_output {
            return Err(Error::responder(format!(
                "{} wrote more than {} bytes",
                self.program, self.max_output
            )));
        }

        let status = child
            .wait()
            .await
            .map_err(|e| Error::responder(format!("failed to wait for {}: {}", self.program, e)))?;
        if !status.success() {
            return Err(Error::responder(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        while matches!(stdout.last(), Some(b'\n' | b'\r')) {
            stdout.pop();
        }
        tracing::trace!(program = %self.program, bytes = stdout.len(), "responder command finished");
        Ok(Bytes::from(stdout))
    }
}

impl Responder for CommandResponder {
    fn respond(&self) -> BoxFuture<'_, Result<Bytes>> {
        self.run().boxed()
    }
}
