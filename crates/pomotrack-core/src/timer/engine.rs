//! Timer engine implementation.
//!
//! The timer engine is a countdown state machine. It does not use internal
//! threads - the injected [`TickSource`] schedules ticks and the caller feeds
//! each one back through `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start/start_block--> Running --pause/reset/switch_mode/00:00--> Idle
//! ```
//!
//! Every transition out of `Running` cancels the tick source, so there is
//! never more than one active tick schedule.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(ModeDurations::default(), ManualTicker::new());
//! engine.start();
//! // once per delivered tick:
//! if let Some(event) = engine.tick() { /* session completed */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{Mode, ModeDurations};
use super::ticker::TickSource;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Core timer engine.
#[derive(Debug)]
pub struct TimerEngine<T: TickSource> {
    durations: ModeDurations,
    mode: Mode,
    minutes: u32,
    /// Always in `0..=59`.
    seconds: u32,
    running: bool,
    sessions_completed: u32,
    /// Label of the ad hoc block being counted down, if any.
    label: Option<String>,
    ticker: T,
}

impl<T: TickSource> TimerEngine<T> {
    /// Create a new engine in `Idle`, mode focus, with the full focus
    /// duration on the clock.
    pub fn new(durations: ModeDurations, ticker: T) -> Self {
        let minutes = durations.minutes(Mode::Focus);
        Self {
            durations,
            mode: Mode::Focus,
            minutes,
            seconds: 0,
            running: false,
            sessions_completed: 0,
            label: None,
            ticker,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_minutes(&self) -> u32 {
        self.minutes
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.seconds
    }

    pub fn remaining_secs(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn durations(&self) -> &ModeDurations {
        &self.durations
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_time(self.minutes, self.seconds)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.running,
            remaining_minutes: self.minutes,
            remaining_seconds: self.seconds,
            display: self.display(),
            label: self.label.clone(),
            sessions_completed: self.sessions_completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select a preset. Selecting the current mode is a no-op; otherwise the
    /// countdown is stopped and reloaded with the new mode's full duration.
    pub fn switch_mode(&mut self, mode: Mode) -> Option<Event> {
        if mode == self.mode {
            return None;
        }
        let from = self.mode;
        self.stop();
        self.mode = mode;
        self.reload();
        tracing::debug!(%from, to = %mode, "mode switched");
        Some(Event::ModeSwitched {
            from,
            to: mode,
            duration_min: self.minutes,
            at: Utc::now(),
        })
    }

    /// Start or resume the countdown. Returns `None` if already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.begin();
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Pause the countdown, keeping the remaining time.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.stop();
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Stop and restore the current mode's full duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.stop();
        self.reload();
        Some(Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Replace the countdown with an ad hoc block of `duration_min` minutes
    /// and start it if idle. The mode is left as is.
    pub fn start_block(&mut self, duration_min: u32, label: impl Into<String>) -> Option<Event> {
        let label = label.into();
        self.minutes = duration_min;
        self.seconds = 0;
        self.label = Some(label.clone());
        if !self.running {
            self.begin();
        }
        tracing::debug!(duration_min, %label, "block started");
        Some(Event::BlockStarted {
            mode: self.mode,
            label,
            duration_min,
            at: Utc::now(),
        })
    }

    /// Adopt micro mode and start a micro-length block.
    ///
    /// Unlike `switch_mode`, a running countdown is not stopped first; the
    /// block simply replaces the remaining time.
    pub fn start_micro(&mut self, label: impl Into<String>) -> Option<Event> {
        self.mode = Mode::Micro;
        let minutes = self.durations.minutes(Mode::Micro);
        self.start_block(minutes, label)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::SessionCompleted)` on the tick that lands on
    /// 00:00. Ticks delivered while idle are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.minutes == 0 && self.seconds == 0 {
            return Some(self.complete());
        }
        if self.seconds == 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else {
            self.seconds -= 1;
        }
        if self.minutes == 0 && self.seconds == 0 {
            return Some(self.complete());
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin(&mut self) {
        self.running = true;
        self.ticker.start();
    }

    fn stop(&mut self) {
        self.ticker.cancel();
        self.running = false;
    }

    fn reload(&mut self) {
        self.minutes = self.durations.minutes(self.mode);
        self.seconds = 0;
        self.label = None;
    }

    fn complete(&mut self) -> Event {
        self.stop();
        self.sessions_completed += 1;
        tracing::info!(
            mode = %self.mode,
            sessions_completed = self.sessions_completed,
            "session completed"
        );
        Event::SessionCompleted {
            mode: self.mode,
            is_focus_type: self.mode.is_focus_type(),
            sessions_completed: self.sessions_completed,
            at: Utc::now(),
        }
    }
}

/// Zero-padded `MM:SS`.
pub fn format_time(minutes: u32, seconds: u32) -> String {
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTicker;

    fn engine() -> TimerEngine<ManualTicker> {
        TimerEngine::new(ModeDurations::default(), ManualTicker::new())
    }

    #[test]
    fn starts_idle_in_focus() {
        let engine = engine();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.mode(), Mode::Focus);
        assert_eq!(engine.display(), "25:00");
        assert!(!engine.ticker().is_active());
    }

    #[test]
    fn start_is_idempotent() {
        let mut engine = engine();
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert_eq!(engine.ticker().starts(), 1);
        assert!(engine.ticker().is_active());
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let mut engine = engine();
        assert!(engine.pause().is_none());
        assert_eq!(engine.ticker().cancels(), 0);
    }

    #[test]
    fn pause_then_start_keeps_remaining_time() {
        let mut engine = engine();
        engine.start();
        for _ in 0..75 {
            engine.tick();
        }
        assert_eq!(engine.display(), "23:45");

        engine.pause();
        assert!(!engine.ticker().is_active());
        assert!(engine.tick().is_none());
        assert_eq!(engine.display(), "23:45");

        engine.start();
        assert_eq!(engine.display(), "23:45");
        assert!(engine.ticker().is_active());
    }

    #[test]
    fn tick_borrows_from_minutes() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        assert_eq!((engine.remaining_minutes(), engine.remaining_seconds()), (24, 59));
    }

    #[test]
    fn switch_mode_mid_countdown_reloads_full_duration() {
        let mut engine = engine();
        engine.start();
        for _ in 0..300 {
            engine.tick();
        }
        let event = engine.switch_mode(Mode::Long);
        assert!(matches!(
            event,
            Some(Event::ModeSwitched { from: Mode::Focus, to: Mode::Long, duration_min: 15, .. })
        ));
        assert_eq!(engine.display(), "15:00");
        assert!(!engine.is_running());
        assert!(!engine.ticker().is_active());
    }

    #[test]
    fn switch_to_current_mode_is_noop() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        assert!(engine.switch_mode(Mode::Focus).is_none());
        assert!(engine.is_running());
        assert_eq!(engine.display(), "24:59");
    }

    #[test]
    fn reset_restores_mode_duration() {
        let mut engine = engine();
        engine.switch_mode(Mode::Deep);
        engine.start();
        engine.tick();
        engine.reset();
        assert_eq!(engine.display(), "50:00");
        assert_eq!(engine.state(), TimerState::Idle);
        assert!(!engine.ticker().is_active());
    }

    #[test]
    fn completion_fires_once_on_reaching_zero() {
        let mut engine = engine();
        engine.switch_mode(Mode::Short);
        engine.start();

        let mut completions = Vec::new();
        for n in 1..=300 {
            if let Some(event) = engine.tick() {
                completions.push((n, event));
            }
        }
        assert_eq!(completions.len(), 1);
        let (at_tick, event) = &completions[0];
        assert_eq!(*at_tick, 300);
        assert!(matches!(
            event,
            Event::SessionCompleted { mode: Mode::Short, is_focus_type: false, sessions_completed: 1, .. }
        ));
        assert_eq!(engine.display(), "00:00");
        assert!(!engine.is_running());
        assert!(!engine.ticker().is_active());
        assert!(engine.tick().is_none());
    }

    #[test]
    fn zero_length_block_completes_on_first_tick() {
        let mut engine = engine();
        engine.start_block(0, "empty");
        assert!(engine.tick().is_some_and(|e| e.is_completion()));
    }

    #[test]
    fn start_block_overrides_while_running() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        engine.start_block(40, "Write report");
        assert_eq!(engine.display(), "40:00");
        assert_eq!(engine.label(), Some("Write report"));
        assert_eq!(engine.ticker().starts(), 1);
        assert_eq!(engine.mode(), Mode::Focus);
    }

    #[test]
    fn micro_session_completion_is_not_focus_type() {
        let mut engine = engine();
        engine.start_micro("Inbox");
        assert_eq!(engine.mode(), Mode::Micro);
        assert_eq!(engine.display(), "05:00");
        let completion = (0..300).filter_map(|_| engine.tick()).next();
        assert!(matches!(
            completion,
            Some(Event::SessionCompleted { mode: Mode::Micro, is_focus_type: false, .. })
        ));
    }

    #[test]
    fn reset_clears_block_label() {
        let mut engine = engine();
        engine.start_block(10, "Plan");
        engine.reset();
        assert_eq!(engine.label(), None);
        assert_eq!(engine.display(), "25:00");
    }

    #[test]
    fn format_time_pads() {
        assert_eq!(format_time(5, 7), "05:07");
        assert_eq!(format_time(120, 0), "120:00");
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = engine();
        match engine.snapshot() {
            Event::StateSnapshot {
                mode,
                running,
                remaining_minutes,
                remaining_seconds,
                display,
                ..
            } => {
                assert_eq!(mode, Mode::Focus);
                assert!(!running);
                assert_eq!((remaining_minutes, remaining_seconds), (25, 0));
                assert_eq!(display, "25:00");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
