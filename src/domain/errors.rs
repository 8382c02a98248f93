//! Error taxonomy for the bounty scoring system.
//!
//! Every failure mode of a scoring task maps onto one of these variants so
//! callers can distinguish operator mistakes (`Configuration`), API misuse
//! (`Usage`), environmental failures (`NotFound`/`Io`/`Fetch`), toolchain
//! failures (`Process`), result-table violations (`ResultFormat`), and the
//! one non-failure outcome (`Cancelled`). No internal retries: every error
//! is fatal for the current task invocation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a scoring task or one of its collaborators.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The task API was invoked incorrectly (e.g. `score()` called twice).
    /// Never retried; always surfaced to the caller immediately.
    #[error("usage error: {0}")]
    Usage(String),

    /// A required external location is missing or a reference is malformed.
    /// The message carries the expected path or URL so an operator can fix it.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A file the pipeline depends on does not exist.
    #[error("missing file: {}", .path.display())]
    NotFound {
        /// The specific path that was expected to exist.
        path: PathBuf,
    },

    /// An I/O operation failed on a known path.
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        /// The path the operation was acting on.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Fetching a model snapshot from the hub failed.
    #[error("fetch failed for model {model}: {reason}")]
    Fetch {
        /// The `namespace/name` model identifier.
        model: String,
        /// What went wrong (HTTP status, transport error, ...).
        reason: String,
    },

    /// An external command exited with a non-zero status.
    #[error("{program} exited with status {code:?}")]
    Process {
        /// The program that was invoked.
        program: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Bounded tail of the captured stdout/stderr.
        tail: String,
    },

    /// The results table exists but violates the expected format.
    #[error("results table format error in column {column:?}: {reason}")]
    ResultFormat {
        /// The accuracy column that was being read.
        column: String,
        /// Why the value could not be extracted.
        reason: String,
    },

    /// The task was cancelled. A first-class outcome, not a failure:
    /// callers treat "the user stopped this" differently from "this broke".
    #[error("scoring was cancelled")]
    Cancelled,
}

impl ScoreError {
    /// Returns `true` if this is the cancellation outcome.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Wraps an I/O error with the path it occurred on, mapping
    /// `NotFound` onto the dedicated variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Convenience alias used throughout the crate.
pub type ScoreResult<T> = Result<T, ScoreError>;
