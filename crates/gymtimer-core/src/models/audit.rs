//! Lifecycle audit event data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded lifecycle or timer-completion notification.
///
/// Append-only, like [`super::Session`]. The `id` is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub id: i64,
    pub event_name: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Create an audit event with a known id, timestamped now.
    pub fn new(id: i64, event_name: impl Into<String>) -> Self {
        Self {
            id,
            event_name: event_name.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an audit event with a known id and timestamp.
    pub fn with_timestamp(
        id: i64,
        event_name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            event_name: event_name.into(),
            timestamp,
        }
    }

    /// Render the event as a log line: `[HH:MM:SS] name`
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.event_name)
    }
}
