//! Minimal console presentation adapter: forwards lifecycle events into the
//! engine, renders its observable state, and runs one short countdown.

use std::error::Error;
use std::sync::Arc;

use gymtimer_core::models::format_seconds;
use gymtimer_core::storage::{ConfigStorage, CsvHistoryStore, get_config_dir, init_data_dir};
use gymtimer_engine::{HistoryService, TimerEngine, TimerEventType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let data_dir = init_data_dir()?;
    let store = Arc::new(CsvHistoryStore::open(data_dir)?);
    let config = ConfigStorage::new(get_config_dir()).load()?;
    config.validate()?;

    let engine = TimerEngine::new(Arc::new(HistoryService::new(store)), &config);
    let mut rx = engine.subscribe();

    engine.audit_event("onStart");
    engine.set_duration(5).await?;
    engine.start().await;

    loop {
        match rx.recv().await?.event_type {
            TimerEventType::Tick { seconds } => println!("  {}", format_seconds(seconds)),
            TimerEventType::Finished => {
                println!("Countdown finished");
                break;
            }
            TimerEventType::AuditLogUpdated { events } => {
                for event in &events {
                    println!("  {}", event.display_line());
                }
            }
            _ => {}
        }
    }

    engine.audit_event("onStop");
    engine.dispose().await;

    // Give the fire-and-forget writes a moment to land
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    Ok(())
}
