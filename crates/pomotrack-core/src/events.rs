use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Every timer state change produces an Event.
/// The front end prints them; the dashboard reacts to completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: Mode,
        to: Mode,
        duration_min: u32,
        at: DateTime<Utc>,
    },
    /// An ad hoc block (plan block or micro session) replaced the countdown.
    BlockStarted {
        mode: Mode,
        label: String,
        duration_min: u32,
        at: DateTime<Utc>,
    },
    /// Fired exactly once when a countdown reaches 00:00.
    SessionCompleted {
        mode: Mode,
        is_focus_type: bool,
        sessions_completed: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        running: bool,
        remaining_minutes: u32,
        remaining_seconds: u32,
        display: String,
        label: Option<String>,
        sessions_completed: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the completion event.
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::SessionCompleted { .. })
    }
}
