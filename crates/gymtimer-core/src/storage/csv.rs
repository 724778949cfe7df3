//! History storage backed by append-only CSV files

use crate::{
    Error, Result,
    models::{AuditEvent, Session},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::HistoryStore;

const SESSIONS_FILE: &str = "sessions.csv";
const AUDIT_FILE: &str = "audit.csv";

/// CSV-friendly representation of a Session
#[derive(Debug, Serialize, Deserialize)]
struct SessionCsv {
    id: i64,
    duration_seconds: u64,
    completed_at: String,
}

impl From<&Session> for SessionCsv {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            duration_seconds: session.duration_seconds,
            completed_at: session.completed_at.to_rfc3339(),
        }
    }
}

impl TryFrom<SessionCsv> for Session {
    type Error = Error;

    fn try_from(csv: SessionCsv) -> Result<Self> {
        Ok(Self {
            id: csv.id,
            duration_seconds: csv.duration_seconds,
            completed_at: DateTime::parse_from_rfc3339(&csv.completed_at)
                .map_err(|e| Error::InvalidData(format!("Invalid completed_at: {}", e)))?
                .with_timezone(&Utc),
        })
    }
}

/// CSV-friendly representation of an AuditEvent
#[derive(Debug, Serialize, Deserialize)]
struct AuditCsv {
    id: i64,
    event_name: String,
    timestamp: String,
}

impl From<&AuditEvent> for AuditCsv {
    fn from(event: &AuditEvent) -> Self {
        Self {
            id: event.id,
            event_name: event.event_name.clone(),
            timestamp: event.timestamp.to_rfc3339(),
        }
    }
}

impl TryFrom<AuditCsv> for AuditEvent {
    type Error = Error;

    fn try_from(csv: AuditCsv) -> Result<Self> {
        Ok(Self {
            id: csv.id,
            event_name: csv.event_name,
            timestamp: DateTime::parse_from_rfc3339(&csv.timestamp)
                .map_err(|e| Error::InvalidData(format!("Invalid timestamp: {}", e)))?
                .with_timezone(&Utc),
        })
    }
}

/// Durable history backend: `sessions.csv` and `audit.csv` under the data dir.
///
/// Id sequences are recovered by scanning the files on open, so a reopened
/// store continues numbering where the previous process stopped. Appends for
/// each file are serialized behind its id counter lock.
pub struct CsvHistoryStore {
    data_dir: PathBuf,
    next_session_id: Mutex<i64>,
    next_event_id: Mutex<i64>,
}

impl CsvHistoryStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let next_session_id = load_sessions(&data_dir.join(SESSIONS_FILE))?
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            + 1;
        let next_event_id = load_audit_events(&data_dir.join(AUDIT_FILE))?
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            + 1;

        Ok(Self {
            data_dir,
            next_session_id: Mutex::new(next_session_id),
            next_event_id: Mutex::new(next_event_id),
        })
    }

    fn sessions_path(&self) -> PathBuf {
        self.data_dir.join(SESSIONS_FILE)
    }

    fn audit_path(&self) -> PathBuf {
        self.data_dir.join(AUDIT_FILE)
    }
}

impl HistoryStore for CsvHistoryStore {
    fn insert_session(
        &self,
        duration_seconds: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<Session> {
        let mut next_id = self
            .next_session_id
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let session = Session::with_completed_at(*next_id, duration_seconds, completed_at);

        append_row(
            &self.sessions_path(),
            &["id", "duration_seconds", "completed_at"],
            &SessionCsv::from(&session),
        )?;

        *next_id += 1;
        Ok(session)
    }

    fn insert_audit_event(&self, event_name: &str, timestamp: DateTime<Utc>) -> Result<AuditEvent> {
        let mut next_id = self.next_event_id.lock().unwrap_or_else(|e| e.into_inner());
        let event = AuditEvent::with_timestamp(*next_id, event_name, timestamp);

        append_row(
            &self.audit_path(),
            &["id", "event_name", "timestamp"],
            &AuditCsv::from(&event),
        )?;

        *next_id += 1;
        Ok(event)
    }

    fn sessions_desc(&self) -> Result<Vec<Session>> {
        let mut sessions = load_sessions(&self.sessions_path())?;
        sessions.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(sessions)
    }

    fn audit_events_desc(&self) -> Result<Vec<AuditEvent>> {
        let mut events = load_audit_events(&self.audit_path())?;
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(events)
    }
}

fn append_row<T: Serialize>(path: &Path, header: &[&str], row: &T) -> Result<()> {
    let file_exists = path.exists();

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    // When appending, don't write headers
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    // Only write header for brand new file
    if !file_exists {
        writer.write_record(header)?;
    }

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

fn load_sessions(path: &Path) -> Result<Vec<Session>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut sessions = Vec::new();

    for result in reader.deserialize() {
        let row: SessionCsv = result?;
        sessions.push(Session::try_from(row)?);
    }

    Ok(sessions)
}

fn load_audit_events(path: &Path) -> Result<Vec<AuditEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut events = Vec::new();

    for result in reader.deserialize() {
        let row: AuditCsv = result?;
        events.push(AuditEvent::try_from(row)?);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_insert_assigns_monotonic_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::open(dir.path()).unwrap();

        let first = store.insert_session(30, Utc::now()).unwrap();
        let second = store.insert_session(45, Utc::now()).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_sessions_desc_orders_by_completion() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::open(dir.path()).unwrap();

        let base = Utc::now();
        store.insert_session(10, base).unwrap();
        store
            .insert_session(20, base + ChronoDuration::seconds(5))
            .unwrap();
        store
            .insert_session(30, base + ChronoDuration::seconds(2))
            .unwrap();

        let sessions = store.sessions_desc().unwrap();
        let durations: Vec<u64> = sessions.iter().map(|s| s.duration_seconds).collect();
        assert_eq!(durations, vec![20, 30, 10]);
    }

    #[test]
    fn test_equal_timestamps_break_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::open(dir.path()).unwrap();

        let now = Utc::now();
        store.insert_audit_event("onCreate", now).unwrap();
        store.insert_audit_event("onStart", now).unwrap();
        store.insert_audit_event("onResume", now).unwrap();

        let events = store.audit_events_desc().unwrap();
        let names: Vec<&str> = events.iter().map(|e| e.event_name.as_str()).collect();
        assert_eq!(names, vec!["onResume", "onStart", "onCreate"]);
    }

    #[test]
    fn test_reopen_continues_id_sequence() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = CsvHistoryStore::open(dir.path()).unwrap();
            store.insert_session(10, Utc::now()).unwrap();
            store.insert_session(20, Utc::now()).unwrap();
        }

        let store = CsvHistoryStore::open(dir.path()).unwrap();
        let third = store.insert_session(30, Utc::now()).unwrap();
        assert_eq!(third.id, 3);

        let sessions = store.sessions_desc().unwrap();
        assert_eq!(sessions.len(), 3);
    }

    #[test]
    fn test_empty_store_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::open(dir.path()).unwrap();

        assert!(store.sessions_desc().unwrap().is_empty());
        assert!(store.audit_events_desc().unwrap().is_empty());
    }

    #[test]
    fn test_audit_roundtrip_preserves_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::open(dir.path()).unwrap();

        let ts = Utc::now();
        let inserted = store.insert_audit_event("TIMER_FINISHED", ts).unwrap();

        let events = store.audit_events_desc().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, inserted.id);
        assert_eq!(events[0].event_name, "TIMER_FINISHED");
        // RFC3339 keeps sub-second precision
        assert_eq!(events[0].timestamp, ts);
    }
}
