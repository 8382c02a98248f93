//! Progress sink port.
//!
//! One-way, fire-and-forget channel for structured progress events emitted
//! by a running task. The sink is owned by the caller and injected at task
//! construction; a task never depends on a concrete backend.
//!
//! # Design rationale
//!
//! - Decouples scoring logic from the logging/telemetry backend.
//! - Enables test sinks that capture events for assertions.
//! - The sink is never *required* to be invoked and must tolerate an
//!   unavailable backend; emitting is best-effort by contract.
//! - Synchronous paths (`cancel`, `cleanup`) cannot await the sink and
//!   fall back to the `tracing` facade directly.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Severity of a progress event.
///
/// Ordered from most verbose to most severe so sinks can filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Detailed diagnostics.
    Debug,
    /// Normal lifecycle events.
    Info,
    /// Unexpected but non-fatal conditions.
    Warning,
    /// Failure conditions.
    Error,
}

impl Severity {
    /// String form used on the wire and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Observer receiving structured progress events from a running task.
///
/// Implementations must be `Send + Sync`; a sink may be shared by many
/// concurrent tasks, each identified by its `job_id`.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Emits one event. Fire-and-forget: implementations swallow their own
    /// delivery failures rather than surfacing them to the scoring path.
    async fn emit(
        &self,
        severity: Severity,
        message: &str,
        job_id: &str,
        fields: HashMap<String, Value>,
    );
}

/// Sink that drops every event, for callers that do not observe progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl ProgressSink for NullSink {
    async fn emit(
        &self,
        _severity: Severity,
        _message: &str,
        _job_id: &str,
        _fields: HashMap<String, Value>,
    ) {
    }
}
