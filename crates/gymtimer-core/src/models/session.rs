//! Completed exercise session data model

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed timed interval, persisted with its final duration.
///
/// Sessions are append-only: once written they are never mutated or deleted.
/// The `id` is assigned by the store on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: i64,
    pub duration_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

impl Session {
    /// Create a session record with a known id, completed now.
    pub fn new(id: i64, duration_seconds: u64) -> Self {
        Self {
            id,
            duration_seconds,
            completed_at: Utc::now(),
        }
    }

    /// Create a session record with a known id and completion time.
    pub fn with_completed_at(
        id: i64,
        duration_seconds: u64,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            duration_seconds,
            completed_at,
        }
    }

    /// Validate the session data
    pub fn validate(&self) -> Result<()> {
        if self.duration_seconds == 0 {
            return Err(Error::Validation(
                "Session duration must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the duration as a formatted string (HH:MM:SS)
    pub fn duration_formatted(&self) -> String {
        super::format_seconds(self.duration_seconds)
    }

    /// Get the duration in minutes (rounded)
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_seconds + 30) / 60
    }
}
