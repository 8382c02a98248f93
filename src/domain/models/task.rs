//! Task lifecycle state machine.
//!
//! One run of the scoring procedure for a single submission. `Idle` is the
//! only initial state; `Completed`, `Failed` and `Cancelled` are terminal
//! and mutually exclusive. `Cancelling` is transient: entered when
//! cancellation is requested while running, and always resolves to
//! `Cancelled`, never silently back to `Completed`.

use serde::{Deserialize, Serialize};

/// State of a scoring task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Constructed, `score()` not yet called.
    Idle,
    /// A scoring strategy invocation is in flight.
    Running,
    /// Cancellation was requested while running; teardown in progress.
    Cancelling,
    /// Scoring produced a score.
    Completed,
    /// Scoring failed with a typed error.
    Failed,
    /// The task was cancelled before producing a score.
    Cancelled,
}

impl Default for TaskState {
    fn default() -> Self {
        Self::Idle
    }
}

impl TaskState {
    /// String form used in logs and progress events.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Cancelling => "cancelling",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Check if this is a terminal state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Valid transitions from this state.
    pub fn valid_transitions(self) -> Vec<Self> {
        match self {
            // Pre-emptive cancellation goes straight to Cancelled.
            Self::Idle => vec![Self::Running, Self::Cancelled],
            Self::Running => vec![Self::Cancelling, Self::Completed, Self::Failed],
            Self::Cancelling => vec![Self::Cancelled],
            Self::Completed | Self::Failed | Self::Cancelled => vec![],
        }
    }

    /// Whether moving to `next` is a legal transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        self.valid_transitions().contains(&next)
    }
}
