//! In-memory history backend for tests and demos

use crate::Result;
use crate::models::{AuditEvent, Session};
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use super::HistoryStore;

#[derive(Debug)]
struct Inner {
    sessions: Vec<Session>,
    events: Vec<AuditEvent>,
    next_session_id: i64,
    next_event_id: i64,
}

/// Volatile [`HistoryStore`] with the same id-assignment and ordering contract
/// as the CSV backend. Nothing survives the process.
#[derive(Debug)]
pub struct MemoryHistoryStore {
    inner: Mutex<Inner>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                sessions: Vec::new(),
                events: Vec::new(),
                next_session_id: 1,
                next_event_id: 1,
            }),
        }
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn insert_session(
        &self,
        duration_seconds: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<Session> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let session =
            Session::with_completed_at(inner.next_session_id, duration_seconds, completed_at);
        inner.next_session_id += 1;
        inner.sessions.push(session.clone());
        Ok(session)
    }

    fn insert_audit_event(&self, event_name: &str, timestamp: DateTime<Utc>) -> Result<AuditEvent> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let event = AuditEvent::with_timestamp(inner.next_event_id, event_name, timestamp);
        inner.next_event_id += 1;
        inner.events.push(event.clone());
        Ok(event)
    }

    fn sessions_desc(&self) -> Result<Vec<Session>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut sessions = inner.sessions.clone();
        sessions.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(sessions)
    }

    fn audit_events_desc(&self) -> Result<Vec<AuditEvent>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut events = inner.events.clone();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_query() {
        let store = MemoryHistoryStore::new();

        let session = store.insert_session(42, Utc::now()).unwrap();
        assert_eq!(session.id, 1);
        assert_eq!(session.duration_seconds, 42);

        let sessions = store.sessions_desc().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0], session);
    }

    #[test]
    fn test_newest_first() {
        let store = MemoryHistoryStore::new();
        let now = Utc::now();

        store.insert_audit_event("onCreate", now).unwrap();
        store.insert_audit_event("onStart", now).unwrap();

        let events = store.audit_events_desc().unwrap();
        assert_eq!(events[0].event_name, "onStart");
        assert_eq!(events[1].event_name, "onCreate");
    }
}
