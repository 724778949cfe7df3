//! End-to-end tests over the durable CSV backend

use std::sync::Arc;
use std::time::Duration;

use gymtimer_core::models::TimerConfig;
use gymtimer_core::storage::{CsvHistoryStore, HistoryStore};
use gymtimer_engine::{FINISHED_EVENT, HistoryService, TimerEngine};
use tokio::time::{sleep, timeout};

const TICK_MS: u64 = 20;

fn engine_over(store: Arc<CsvHistoryStore>, default_duration_seconds: u64) -> TimerEngine {
    let config = TimerConfig {
        default_duration_seconds,
        audit_log_limit: 20,
        tick_interval_ms: TICK_MS,
    };
    TimerEngine::new(Arc::new(HistoryService::new(store)), &config)
}

async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    timeout(Duration::from_secs(10), async {
        loop {
            if condition() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn countdown_completion_lands_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CsvHistoryStore::open(dir.path()).unwrap());
    let engine = engine_over(store.clone(), 2);

    engine.audit_event("onStart");
    engine.start().await;

    wait_until(|| {
        store
            .audit_events_desc()
            .unwrap()
            .iter()
            .any(|e| e.event_name == FINISHED_EVENT)
    })
    .await;
    wait_until(|| store.sessions_desc().unwrap().len() == 1).await;

    let snapshot = engine.snapshot().await;
    assert!(!snapshot.running);
    assert_eq!(snapshot.current_seconds, 0);

    // A fresh store over the same directory sees everything
    let reopened = CsvHistoryStore::open(dir.path()).unwrap();
    let sessions = reopened.sessions_desc().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].duration_seconds, 2);

    let names: Vec<String> = reopened
        .audit_events_desc()
        .unwrap()
        .iter()
        .map(|e| e.event_name.clone())
        .collect();
    assert!(names.contains(&FINISHED_EVENT.to_string()));
    assert!(names.contains(&"onStart".to_string()));
}

#[tokio::test]
async fn stopwatch_reset_appends_to_existing_history() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = Arc::new(CsvHistoryStore::open(dir.path()).unwrap());
        let engine = engine_over(store.clone(), 60);

        engine.set_mode(false).await;
        engine.start().await;
        wait_until_async(&engine, 2).await;
        engine.pause().await;
        engine.reset().await;

        wait_until(|| store.sessions_desc().unwrap().len() == 1).await;
    }

    // Second run against the same directory continues the id sequence
    let store = Arc::new(CsvHistoryStore::open(dir.path()).unwrap());
    let engine = engine_over(store.clone(), 60);

    engine.set_mode(false).await;
    engine.start().await;
    wait_until_async(&engine, 1).await;
    engine.pause().await;
    engine.reset().await;

    wait_until(|| store.sessions_desc().unwrap().len() == 2).await;

    let sessions = store.sessions_desc().unwrap();
    assert!(sessions[0].id > sessions[1].id);
}

async fn wait_until_async(engine: &TimerEngine, at_least_seconds: u64) {
    timeout(Duration::from_secs(10), async {
        loop {
            if engine.snapshot().await.current_seconds >= at_least_seconds {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timer did not advance in time");
}
