//! Progress sink adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::ports::{ProgressSink, Severity};

/// Forwards progress events to the `tracing` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl ProgressSink for TracingSink {
    async fn emit(
        &self,
        severity: Severity,
        message: &str,
        job_id: &str,
        fields: HashMap<String, Value>,
    ) {
        let fields = if fields.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&fields).unwrap_or_default()
        };
        match severity {
            Severity::Debug => tracing::debug!(job_id = %job_id, fields = %fields, "{message}"),
            Severity::Info => tracing::info!(job_id = %job_id, fields = %fields, "{message}"),
            Severity::Warning => tracing::warn!(job_id = %job_id, fields = %fields, "{message}"),
            Severity::Error => tracing::error!(job_id = %job_id, fields = %fields, "{message}"),
        }
    }
}

/// One captured progress event.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// When the event was captured.
    pub at: DateTime<Utc>,
    /// Event severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Job the event belongs to.
    pub job_id: String,
    /// Structured context fields.
    pub fields: HashMap<String, Value>,
}

/// Captures events in memory for assertions in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured events.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All captured messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }

    /// Whether any captured message contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.events().iter().any(|e| e.message.contains(needle))
    }
}

#[async_trait]
impl ProgressSink for MemorySink {
    async fn emit(
        &self,
        severity: Severity,
        message: &str,
        job_id: &str,
        fields: HashMap<String, Value>,
    ) {
        let event = ProgressEvent {
            at: Utc::now(),
            severity,
            message: message.to_string(),
            job_id: job_id.to_string(),
            fields,
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
