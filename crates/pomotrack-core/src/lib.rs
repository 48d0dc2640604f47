//! # pomotrack Core Library
//!
//! Business logic for the pomotrack focus timer. Front ends (the `pomotrack`
//! terminal binary, tests) drive a [`Dashboard`] and render the
//! [`Notification`]s it emits.
//!
//! ## Architecture
//!
//! - **Timer Engine**: countdown state machine over five modes; ticks come
//!   from an injected [`TickSource`] that is cancelled on every exit from
//!   `Running`
//! - **Habit Tracker**: XP, daily streak and today's session count, written
//!   through to local storage on each completion
//! - **Storage**: SQLite key-value blobs and TOML configuration
//! - **Collaborators**: task list, day plan and planner client, idle nudge,
//!   chat and room placeholders
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`HabitTracker`]: Habit statistics
//! - [`Dashboard`]: Wires the timer to its collaborators
//! - [`Database`]: Local key-value persistence
//! - [`Config`]: Application configuration management

pub mod chat;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod habits;
pub mod idle;
pub mod notifier;
pub mod plan;
pub mod room;
pub mod storage;
pub mod tasks;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::Dashboard;
pub use error::{ConfigError, CoreError, DatabaseError, PlannerError, ValidationError};
pub use events::Event;
pub use habits::{HabitRecord, HabitTracker};
pub use notifier::{Notification, Notifier, RecordingNotifier};
pub use plan::{DayPlan, HttpPlanner, PlanBlock, PlanRequest, PlannedBlock};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use tasks::{Task, TaskList};
pub use timer::{
    IntervalTicker, ManualTicker, Mode, ModeDurations, TickReceiver, TickSource, TimerEngine,
    TimerState,
};
