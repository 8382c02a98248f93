//! Process runner port.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::errors::ScoreResult;

/// Fully-specified external command invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Program to execute (PATH name or resolved path).
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Working directory the process runs in.
    pub current_dir: PathBuf,
    /// Extra environment variables set on the child.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Creates a spec with no arguments or extra environment.
    pub fn new(program: impl Into<String>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.into(),
            env: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets one environment variable on the child.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Single-line rendering for logs.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Launches an external command and reports success by exit status.
///
/// The runner captures stdout/stderr fully but only a bounded tail is
/// surfaced in errors. It never inspects output content to infer success:
/// a non-zero exit is always a failure, a zero exit always a success.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the command to completion. `Ok(())` iff the exit status is zero.
    async fn run(&self, spec: &CommandSpec) -> ScoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates() {
        let spec = CommandSpec::new("bench", "/opt/bench")
            .arg("generate")
            .args(["--model", "org/model"])
            .env("TOKENIZERS_PARALLELISM", "false");
        assert_eq!(spec.args, vec!["generate", "--model", "org/model"]);
        assert_eq!(spec.env.len(), 1);
        assert_eq!(spec.display_line(), "bench generate --model org/model");
    }
}
