pub mod config;
pub mod csv;
pub mod memory;

pub use self::csv::CsvHistoryStore;
pub use config::ConfigStorage;
pub use memory::MemoryHistoryStore;

use crate::Result;
use crate::models::{AuditEvent, Session};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Capability contract for the durable history backend.
///
/// Both record kinds are append-only logs: there are no update or delete
/// operations. Inserts assign the record id; scans return newest-first,
/// breaking timestamp ties by id so the order is strict.
pub trait HistoryStore: Send + Sync {
    /// Insert a completed session, returning the record with its assigned id.
    fn insert_session(
        &self,
        duration_seconds: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<Session>;

    /// Insert an audit event, returning the record with its assigned id.
    fn insert_audit_event(
        &self,
        event_name: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<AuditEvent>;

    /// All sessions, newest first by completion time.
    fn sessions_desc(&self) -> Result<Vec<Session>>;

    /// All audit events, newest first by timestamp.
    fn audit_events_desc(&self) -> Result<Vec<AuditEvent>>;
}

pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .expect("Could not find data directory")
        .join("gymtimer")
}

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .expect("Could not find config directory")
        .join("gymtimer")
}

pub fn init_data_dir() -> Result<PathBuf> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

pub fn init_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}
