//! GymTimer Engine
//!
//! The timer state machine and its persistence-coupled transitions: mode
//! switching, start/pause/reset semantics, the 1-second tick mechanism, and
//! the history service that records completed sessions and lifecycle audit
//! events. Presentation layers subscribe to [`TimerEvent`]s and issue intent
//! calls; they never mutate timer state directly.

pub mod engine;
pub mod events;
pub mod history;

pub use engine::{CLEARED_EVENT, EngineError, FINISHED_EVENT, TimerEngine};
pub use events::{TimerEvent, TimerEventType};
pub use history::{HistoryError, HistoryService};
