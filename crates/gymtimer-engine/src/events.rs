//! Timer events

use chrono::{DateTime, Utc};
use gymtimer_core::models::{AuditEvent, TimerMode};
use serde::{Deserialize, Serialize};

/// Event published by the timer engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    pub timestamp: DateTime<Utc>,
}

/// Types of timer events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    /// Timer started or resumed from a paused value
    Started { mode: TimerMode, seconds: u64 },
    /// Timer paused; `seconds` is the retained display value
    Paused { seconds: u64 },
    /// Display restored after a reset
    Reset { seconds: u64 },
    /// Mode switched while idle
    ModeChanged { mode: TimerMode },
    /// Periodic display update
    Tick { seconds: u64 },
    /// Countdown reached zero
    Finished,
    /// Refreshed audit log, newest first
    AuditLogUpdated { events: Vec<AuditEvent> },
}

impl TimerEvent {
    /// Create a new timer event
    pub fn new(event_type: TimerEventType) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
        }
    }

    /// Create a started event
    pub fn started(mode: TimerMode, seconds: u64) -> Self {
        Self::new(TimerEventType::Started { mode, seconds })
    }

    /// Create a paused event
    pub fn paused(seconds: u64) -> Self {
        Self::new(TimerEventType::Paused { seconds })
    }

    /// Create a reset event
    pub fn reset(seconds: u64) -> Self {
        Self::new(TimerEventType::Reset { seconds })
    }

    /// Create a mode changed event
    pub fn mode_changed(mode: TimerMode) -> Self {
        Self::new(TimerEventType::ModeChanged { mode })
    }

    /// Create a tick event
    pub fn tick(seconds: u64) -> Self {
        Self::new(TimerEventType::Tick { seconds })
    }

    /// Create a finished event
    pub fn finished() -> Self {
        Self::new(TimerEventType::Finished)
    }

    /// Create an audit log updated event
    pub fn audit_log_updated(events: Vec<AuditEvent>) -> Self {
        Self::new(TimerEventType::AuditLogUpdated { events })
    }
}
