//! Timer mode and observable state snapshot

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Counts down from a configured duration to zero.
    Countdown,
    /// Counts up from zero indefinitely until paused.
    Stopwatch,
}

impl TimerMode {
    /// Get a human-readable string for the timer mode
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Countdown => "Countdown",
            TimerMode::Stopwatch => "Stopwatch",
        }
    }

    pub fn is_countdown(&self) -> bool {
        matches!(self, TimerMode::Countdown)
    }
}

/// Read-only copy of the engine's state, published to observers.
///
/// `current_seconds` is remaining time in Countdown mode and elapsed time in
/// Stopwatch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub running: bool,
    pub current_seconds: u64,
    pub configured_duration_seconds: u64,
}

impl TimerSnapshot {
    /// Displayed time as HH:MM:SS
    pub fn display_formatted(&self) -> String {
        format_seconds(self.current_seconds)
    }
}

/// Format a second count as HH:MM:SS
pub fn format_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
