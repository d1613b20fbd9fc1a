//! Port for structured session transcripts.
//!
//! Defines the [`SessionLogger`] trait for recording accepted actions
//! (submissions, vote lifecycle, clears) to a machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the session record.
//! Ballot choices are never part of a transcript event.

use serde_json::Value;

/// A structured session event for logging.
pub struct SessionLogEvent {
    /// Event type identifier (e.g., "document_submitted", "vote_closed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SessionLogEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging session events to a structured log.
///
/// `log` is synchronous and non-fallible; logging failures are ignored.
pub trait SessionLogger: Send + Sync {
    fn log(&self, event: SessionLogEvent);
}

/// No-op implementation for tests and when transcripts are disabled.
pub struct NoSessionLogger;

impl SessionLogger for NoSessionLogger {
    fn log(&self, _event: SessionLogEvent) {}
}
