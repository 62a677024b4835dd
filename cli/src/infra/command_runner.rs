//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::application::ports::CommandRunner;

/// Default timeout for docker inspection and lifecycle calls.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for image builds and commands run inside containers (layer
/// downloads and dependency installs can take minutes).
pub const LONG_RUNNING_TIMEOUT: Duration = Duration::from_secs(600);

/// Raised when a child process outlives its timeout. The child is killed.
#[derive(Debug, Error)]
#[error("{program} timed out after {}s", .timeout.as_secs())]
pub struct TimedOut {
    pub program: String,
    pub timeout: Duration,
}

/// Production `CommandRunner`: uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT kill
/// the child process when the timeout fires. This implementation uses
/// `tokio::select!` with explicit `child.kill()` instead.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

fn spawn_piped(program: &str, args: &[&str]) -> Result<tokio::process::Child> {
    tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

async fn read_all(handle: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

/// Drain `handle` to EOF, passing each line to `on_line` and returning the
/// raw bytes. Invalid UTF-8 is replaced and reading continues.
async fn stream_lines(
    handle: Option<impl AsyncRead + Unpin>,
    on_line: &dyn Fn(&str),
) -> Vec<u8> {
    let mut collected = Vec::new();
    let Some(h) = handle else {
        return collected;
    };
    let mut reader = BufReader::new(h);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                collected.extend_from_slice(&line);
                let text = String::from_utf8_lossy(&line);
                on_line(text.trim_end_matches(['\n', '\r']));
            }
        }
    }
    collected
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, "running command");
        let mut child = spawn_piped(program, args)?;
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    read_all(stdout_handle),
                    read_all(stderr_handle),
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                Err(TimedOut { program: program.to_string(), timeout }.into())
            }
        }
    }

    async fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
        on_line: &dyn Fn(&str),
    ) -> Result<Output> {
        tracing::debug!(program, ?args, "running command (streaming)");
        let mut child = spawn_piped(program, args)?;
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    stream_lines(stdout_handle, on_line),
                    stream_lines(stderr_handle, on_line),
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                Err(TimedOut { program: program.to_string(), timeout }.into())
            }
        }
    }
}
