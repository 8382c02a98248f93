//! Tokio-based process runner.
//!
//! Spawns external commands with a controlled environment, captures both
//! output streams fully, and surfaces only a bounded tail in errors so a
//! chatty toolchain cannot blow up memory held in error values.
//!
//! Children are spawned with `kill_on_drop`: if the future driving a run is
//! dropped (the owning task was cancelled), the child is reaped rather than
//! leaked.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::domain::errors::{ScoreError, ScoreResult};
use crate::domain::ports::{CommandSpec, ProcessRunner};

/// Maximum bytes of captured output surfaced in errors and logs.
pub const MAX_OUTPUT_TAIL_BYTES: usize = 4096;

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> ScoreResult<()> {
        tracing::debug!(command = %spec.display_line(), cwd = %spec.current_dir.display(), "spawning process");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.current_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|e| {
            ScoreError::Configuration(format!(
                "failed to spawn {} in {}: {e}",
                spec.program,
                spec.current_dir.display()
            ))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ScoreError::Configuration(format!("failed to capture stdout of {}", spec.program))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            ScoreError::Configuration(format!("failed to capture stderr of {}", spec.program))
        })?;

        // Drain both pipes concurrently so neither can fill and stall the child.
        let (out_text, err_text) = tokio::join!(read_lines(stdout), read_lines(stderr));

        let status = child.wait().await.map_err(|e| {
            ScoreError::Configuration(format!("failed to wait for {}: {e}", spec.program))
        })?;

        if status.success() {
            tracing::debug!(command = %spec.program, "process completed");
            return Ok(());
        }

        let mut combined = out_text;
        if !err_text.is_empty() {
            if !combined.is_empty() {
                combined.push('\n');
            }
            combined.push_str(&err_text);
        }

        Err(ScoreError::Process {
            program: spec.program.clone(),
            code: status.code(),
            tail: output_tail(&combined, MAX_OUTPUT_TAIL_BYTES),
        })
    }
}

async fn read_lines(stream: impl tokio::io::AsyncRead + Unpin) -> String {
    let mut text = String::new();
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Last `max_bytes` of `text`, trimmed to a char boundary.
fn output_tail(text: &str, max_bytes: usize) -> String {
    let text = text.trim_end();
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}
