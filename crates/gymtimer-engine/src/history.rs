//! History service - domain façade over the persistence store

use chrono::Utc;
use std::sync::Arc;

use gymtimer_core::models::{AuditEvent, Session};
use gymtimer_core::storage::HistoryStore;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Storage error: {0}")]
    Storage(#[from] gymtimer_core::Error),

    #[error("Task join error: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// Translates domain operations into store calls.
///
/// Store IO is blocking, so every call is moved onto the blocking pool. The
/// service itself holds no state beyond the store handle and can be cloned
/// freely through its `Arc`.
pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Record a completed session. Durations must be strictly positive.
    pub async fn record_session(&self, duration_seconds: u64) -> Result<Session> {
        if duration_seconds == 0 {
            return Err(HistoryError::InvalidDuration(
                "Session duration must be greater than 0".to_string(),
            ));
        }

        let store = self.store.clone();
        let session = tokio::task::spawn_blocking(move || {
            store.insert_session(duration_seconds, Utc::now())
        })
        .await
        .map_err(|e| HistoryError::Join(e.to_string()))??;

        tracing::debug!(
            "Recorded session {} ({} seconds)",
            session.id,
            session.duration_seconds
        );
        Ok(session)
    }

    /// Record a lifecycle or timer-completion audit event.
    pub async fn record_audit_event(&self, name: &str) -> Result<AuditEvent> {
        let store = self.store.clone();
        let name = name.to_string();
        let event =
            tokio::task::spawn_blocking(move || store.insert_audit_event(&name, Utc::now()))
                .await
                .map_err(|e| HistoryError::Join(e.to_string()))??;

        tracing::debug!("Audited event '{}'", event.event_name);
        Ok(event)
    }

    /// The most recent audit events, newest first, truncated to `limit`.
    pub async fn recent_audit_events(&self, limit: usize) -> Result<Vec<AuditEvent>> {
        let store = self.store.clone();
        let mut events = tokio::task::spawn_blocking(move || store.audit_events_desc())
            .await
            .map_err(|e| HistoryError::Join(e.to_string()))??;
        events.truncate(limit);
        Ok(events)
    }

    /// All completed sessions, newest first.
    pub async fn session_history(&self) -> Result<Vec<Session>> {
        let store = self.store.clone();
        let sessions = tokio::task::spawn_blocking(move || store.sessions_desc())
            .await
            .map_err(|e| HistoryError::Join(e.to_string()))??;
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymtimer_core::storage::MemoryHistoryStore;

    fn service() -> (Arc<MemoryHistoryStore>, HistoryService) {
        let store = Arc::new(MemoryHistoryStore::new());
        let service = HistoryService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_record_session() {
        let (store, service) = service();

        let session = service.record_session(45).await.unwrap();
        assert_eq!(session.duration_seconds, 45);

        let sessions = store.sessions_desc().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0], session);
    }

    #[tokio::test]
    async fn test_zero_duration_rejected_before_store() {
        let (store, service) = service();

        let result = service.record_session(0).await;
        assert!(matches!(result, Err(HistoryError::InvalidDuration(_))));
        assert!(store.sessions_desc().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_audit_events_truncates() {
        let (_store, service) = service();

        for i in 0..25 {
            service
                .record_audit_event(&format!("event-{}", i))
                .await
                .unwrap();
        }

        let events = service.recent_audit_events(20).await.unwrap();
        assert_eq!(events.len(), 20);
        // Newest first: the last write leads
        assert_eq!(events[0].event_name, "event-24");
        for pair in events.windows(2) {
            assert!(pair[0].id > pair[1].id);
        }
    }

    #[tokio::test]
    async fn test_session_history_newest_first() {
        let (_store, service) = service();

        service.record_session(10).await.unwrap();
        service.record_session(20).await.unwrap();

        let sessions = service.session_history().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].duration_seconds, 20);
        assert_eq!(sessions[1].duration_seconds, 10);
    }
}
