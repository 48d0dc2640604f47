mod engine;
mod mode;
mod ticker;

pub use engine::{format_time, TimerEngine, TimerState};
pub use mode::{Mode, ModeDurations};
pub use ticker::{IntervalTicker, ManualTicker, Tick, TickReceiver, TickSource};
