//! Timer engine - the state machine driving countdown and stopwatch modes
//!
//! The engine exclusively owns the timer state. At most one tick task exists
//! at any instant: it is held in a single handle slot, aborted on pause and
//! replaced on start. Every persistence call is best-effort; a storage
//! failure is logged and never stops the ticker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, broadcast};
use tokio::task::JoinHandle;

use gymtimer_core::models::{TimerConfig, TimerMode, TimerSnapshot};

use crate::events::TimerEvent;
use crate::history::HistoryService;

/// Audit event recorded when a countdown reaches zero.
pub const FINISHED_EVENT: &str = "TIMER_FINISHED";
/// Audit event recorded when the engine is disposed.
pub const CLEARED_EVENT: &str = "cleared";

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug)]
struct TimerState {
    mode: TimerMode,
    running: bool,
    /// Remaining seconds in Countdown mode, elapsed seconds in Stopwatch mode.
    current_seconds: u64,
    configured_duration_seconds: u64,
}

pub struct TimerEngine {
    state: Arc<RwLock<TimerState>>,
    /// The single active ticker. Aborted before being replaced.
    ticker: Mutex<Option<JoinHandle<()>>>,
    history: Arc<HistoryService>,
    event_tx: broadcast::Sender<TimerEvent>,
    tick_interval: Duration,
    audit_log_limit: usize,
}

impl TimerEngine {
    pub fn new(history: Arc<HistoryService>, config: &TimerConfig) -> Self {
        let (event_tx, _) = broadcast::channel(1000);

        let state = TimerState {
            mode: TimerMode::Countdown,
            running: false,
            current_seconds: config.default_duration_seconds,
            configured_duration_seconds: config.default_duration_seconds,
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            ticker: Mutex::new(None),
            history,
            event_tx,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            audit_log_limit: config.audit_log_limit,
        }
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Read-only copy of the current state
    pub async fn snapshot(&self) -> TimerSnapshot {
        let state = self.state.read().await;
        TimerSnapshot {
            mode: state.mode,
            running: state.running,
            current_seconds: state.current_seconds,
            configured_duration_seconds: state.configured_duration_seconds,
        }
    }

    /// Switch between Countdown and Stopwatch mode.
    ///
    /// Silently ignored while running; the adapter disables the controls, but
    /// the engine rejects the call as well. Switching primes the display with
    /// the configured duration (Countdown) or zero (Stopwatch). Nothing is
    /// persisted here; an idle adapter is expected to follow up with
    /// [`reset`](Self::reset).
    pub async fn set_mode(&self, countdown: bool) {
        let (mode, seconds) = {
            let mut state = self.state.write().await;
            if state.running {
                return;
            }

            state.mode = if countdown {
                TimerMode::Countdown
            } else {
                TimerMode::Stopwatch
            };
            state.current_seconds = if countdown {
                state.configured_duration_seconds
            } else {
                0
            };
            (state.mode, state.current_seconds)
        };

        let _ = self.event_tx.send(TimerEvent::mode_changed(mode));
        let _ = self.event_tx.send(TimerEvent::tick(seconds));
    }

    /// Configure the countdown target duration and force Countdown mode.
    ///
    /// Zero durations fail fast without touching state. Silently ignored
    /// while running.
    pub async fn set_duration(&self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(EngineError::InvalidDuration(
                "Configured duration must be greater than 0".to_string(),
            ));
        }

        let current = {
            let mut state = self.state.write().await;
            if state.running {
                return Ok(());
            }

            state.configured_duration_seconds = seconds;
            state.current_seconds = seconds;
            state.mode = TimerMode::Countdown;
            state.current_seconds
        };

        let _ = self
            .event_tx
            .send(TimerEvent::mode_changed(TimerMode::Countdown));
        let _ = self.event_tx.send(TimerEvent::tick(current));
        Ok(())
    }

    /// Pause if running, start otherwise.
    pub async fn toggle(&self) {
        let running = self.state.read().await.running;
        if running {
            self.pause().await;
        } else {
            self.start().await;
        }
    }

    /// Start or resume the timer. Idempotent while running.
    ///
    /// The current display value becomes the tick baseline, so resuming
    /// continues from the exact paused value.
    pub async fn start(&self) {
        let (mode, baseline, configured) = {
            let mut state = self.state.write().await;
            if state.running {
                return;
            }
            state.running = true;
            (
                state.mode,
                state.current_seconds,
                state.configured_duration_seconds,
            )
        };

        // Clear any stale handle before the new ticker takes the slot
        {
            let mut ticker = self.ticker.lock().await;
            if let Some(stale) = ticker.take() {
                stale.abort();
            }
        }

        let _ = self.event_tx.send(TimerEvent::started(mode, baseline));

        let handle = match mode {
            TimerMode::Countdown => self.spawn_countdown(baseline, configured),
            TimerMode::Stopwatch => self.spawn_stopwatch(baseline),
        };

        *self.ticker.lock().await = Some(handle);
    }

    /// Pause the timer, retaining the displayed value. Idempotent.
    pub async fn pause(&self) {
        let seconds = {
            let mut state = self.state.write().await;
            if !state.running {
                return;
            }
            state.running = false;
            state.current_seconds
        };

        // The ticker re-checks `running` under the state lock before applying
        // a tick, so nothing lands after this point.
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }

        let _ = self.event_tx.send(TimerEvent::paused(seconds));
    }

    /// Finalize the current interval and restore the display.
    ///
    /// In Countdown mode the *configured* duration is recorded, matching the
    /// session history the app has always produced; in Stopwatch mode the
    /// displayed elapsed time is recorded. Zero durations record nothing.
    pub async fn reset(&self) {
        self.pause().await;

        let (mode, finalized, restored) = {
            let mut state = self.state.write().await;
            let finalized = match state.mode {
                TimerMode::Countdown => state.configured_duration_seconds,
                TimerMode::Stopwatch => state.current_seconds,
            };
            state.current_seconds = match state.mode {
                TimerMode::Countdown => state.configured_duration_seconds,
                TimerMode::Stopwatch => 0,
            };
            (state.mode, finalized, state.current_seconds)
        };

        if finalized > 0 {
            let history = self.history.clone();
            tokio::spawn(async move {
                match history.record_session(finalized).await {
                    Ok(session) => tracing::debug!(
                        "Recorded {} session of {} seconds",
                        mode.as_str(),
                        session.duration_seconds
                    ),
                    Err(e) => tracing::warn!("Failed to record session: {}", e),
                }
            });
        }

        let _ = self.event_tx.send(TimerEvent::reset(restored));
    }

    /// Record a lifecycle audit event, then publish the refreshed log.
    ///
    /// Fire-and-forget: the write and the re-fetch run sequentially in one
    /// task, so the published log always contains the event just recorded.
    pub fn audit_event(&self, name: impl Into<String>) {
        let name = name.into();
        let history = self.history.clone();
        let event_tx = self.event_tx.clone();
        let limit = self.audit_log_limit;

        tokio::spawn(async move {
            if let Err(e) = history.record_audit_event(&name).await {
                tracing::warn!("Failed to audit '{}': {}", name, e);
            }
            match history.recent_audit_events(limit).await {
                Ok(events) => {
                    let _ = event_tx.send(TimerEvent::audit_log_updated(events));
                }
                Err(e) => tracing::warn!("Failed to refresh audit log: {}", e),
            }
        });
    }

    /// Publish the most recent audit events to observers. Fire-and-forget.
    pub fn load_audit_log(&self) {
        let history = self.history.clone();
        let event_tx = self.event_tx.clone();
        let limit = self.audit_log_limit;

        tokio::spawn(async move {
            match history.recent_audit_events(limit).await {
                Ok(events) => {
                    let _ = event_tx.send(TimerEvent::audit_log_updated(events));
                }
                Err(e) => tracing::warn!("Failed to load audit log: {}", e),
            }
        });
    }

    /// Tear the engine down: cancel any ticker and record a final audit
    /// event. No further operations are valid afterwards.
    pub async fn dispose(&self) {
        {
            let mut state = self.state.write().await;
            state.running = false;
        }

        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }

        self.audit_event(CLEARED_EVENT);
    }

    fn spawn_countdown(&self, baseline: u64, configured: u64) -> JoinHandle<()> {
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        let history = self.history.clone();
        let tick = self.tick_interval;
        let limit = self.audit_log_limit;

        tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut interval = tokio::time::interval(tick);
            // The first interval tick completes immediately; consume it so
            // the first decrement lands one full interval after start.
            interval.tick().await;

            loop {
                interval.tick().await;

                // Whole intervals since start, taken from the clock rather
                // than a counter, so a delayed fire cannot accumulate drift.
                let fired = (started.elapsed().as_millis() / tick.as_millis().max(1)) as u64;
                let remaining = baseline.saturating_sub(fired);

                {
                    let mut state = state.write().await;
                    if !state.running {
                        break;
                    }
                    state.current_seconds = remaining;
                }
                let _ = event_tx.send(TimerEvent::tick(remaining));

                if remaining == 0 {
                    {
                        let mut state = state.write().await;
                        state.running = false;
                    }
                    let _ = event_tx.send(TimerEvent::finished());

                    if let Err(e) = history.record_audit_event(FINISHED_EVENT).await {
                        tracing::warn!("Failed to audit countdown completion: {}", e);
                    }
                    match history.recent_audit_events(limit).await {
                        Ok(events) => {
                            let _ = event_tx.send(TimerEvent::audit_log_updated(events));
                        }
                        Err(e) => tracing::warn!("Failed to refresh audit log: {}", e),
                    }
                    if let Err(e) = history.record_session(configured).await {
                        tracing::warn!("Failed to record completed session: {}", e);
                    }
                    break;
                }
            }
        })
    }

    fn spawn_stopwatch(&self, baseline: u64) -> JoinHandle<()> {
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        let tick = self.tick_interval;

        tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut interval = tokio::time::interval(tick);
            interval.tick().await;

            loop {
                interval.tick().await;

                let fired = (started.elapsed().as_millis() / tick.as_millis().max(1)) as u64;
                let elapsed = baseline + fired;

                {
                    let mut state = state.write().await;
                    if !state.running {
                        break;
                    }
                    state.current_seconds = elapsed;
                }
                let _ = event_tx.send(TimerEvent::tick(elapsed));
            }
        })
    }
}
