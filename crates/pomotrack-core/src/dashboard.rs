//! The dashboard wires the timer to its collaborators.
//!
//! Each user action and each delivered tick maps to one method here. The
//! timer engine decides what happened; the dashboard forwards completions to
//! the habit tracker and the day plan and tells the [`Notifier`] what to show.

use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::chat::ChatLog;
use crate::clock::Clock;
use crate::error::{PlannerError, Result};
use crate::events::Event;
use crate::habits::{HabitRecord, HabitTracker};
use crate::idle::IdleMonitor;
use crate::notifier::{filled_dots, Notification, Notifier};
use crate::plan::{DayPlan, PlanRequest, PlannedBlock};
use crate::room::{Presence, Room};
use crate::storage::{Config, KeyValueStore};
use crate::tasks::{TaskList, FALLBACK_TASK};
use crate::timer::{Mode, TickSource, TimerEngine};

pub const CELEBRATION: &str = "Nice work! Focus block completed.";
pub const PLAN_READY: &str = "Plan ready. Click 'Start next block'.";
pub const ALL_BLOCKS_DONE: &str = "All blocks done";

const MEMBER_NAME: &str = "You";

pub struct Dashboard<T: TickSource, N: Notifier> {
    engine: TimerEngine<T>,
    habits: HabitTracker,
    tasks: TaskList,
    plan: DayPlan,
    idle: IdleMonitor,
    idle_enabled: bool,
    chat: ChatLog,
    room: Option<Room>,
    dots: usize,
    notifier: N,
}

impl<T: TickSource, N: Notifier> Dashboard<T, N> {
    /// Build the dashboard, load persisted state, and paint the initial view.
    pub fn new(
        config: &Config,
        ticker: T,
        notifier: N,
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let mut dashboard = Self {
            engine: TimerEngine::new(config.modes.clone(), ticker),
            tasks: TaskList::load(Rc::clone(&store)),
            habits: HabitTracker::load(store, clock),
            plan: DayPlan::default(),
            idle: IdleMonitor::new(config.idle.nudge_after_min, Utc::now()),
            idle_enabled: config.idle.enabled,
            chat: ChatLog::new(),
            room: None,
            dots: config.ui.session_dots as usize,
            notifier,
        };
        dashboard.refresh_display();
        dashboard.refresh_dots();
        dashboard.notifier.notify(Notification::Overlay(false));
        dashboard.refresh_tasks();
        dashboard.refresh_habits();
        dashboard
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine<T> {
        &self.engine
    }

    pub fn habits(&self) -> &HabitRecord {
        self.habits.record()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn plan(&self) -> &DayPlan {
        &self.plan
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// True when the idle nudge should fire at `now`.
    pub fn idle_nudge_due(&self, now: DateTime<Utc>) -> bool {
        self.idle_enabled && self.idle.should_nudge(now, self.engine.is_running())
    }

    // ── Timer controls ───────────────────────────────────────────────

    pub fn select_mode(&mut self, mode: Mode) -> Option<Event> {
        self.touch();
        let event = self.engine.switch_mode(mode)?;
        self.notifier.notify(Notification::ModeChanged(mode));
        self.refresh_display();
        self.refresh_presence();
        Some(event)
    }

    pub fn start(&mut self) -> Option<Event> {
        self.touch();
        let event = self.engine.start();
        self.refresh_presence();
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.touch();
        let event = self.engine.pause();
        self.refresh_presence();
        event
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.touch();
        let event = self.engine.reset();
        self.refresh_display();
        self.refresh_presence();
        event
    }

    /// Feed one delivered tick to the engine.
    pub fn on_tick(&mut self) -> Option<Event> {
        if !self.engine.is_running() {
            return None;
        }
        let event = self.engine.tick();
        self.refresh_display();
        if let Some(Event::SessionCompleted { is_focus_type, .. }) = &event {
            self.handle_completion(*is_focus_type);
        }
        event
    }

    pub fn dismiss_overlay(&mut self) {
        self.touch();
        self.notifier.notify(Notification::Overlay(false));
    }

    // ── Plan and micro sessions ──────────────────────────────────────

    /// Build a plan request from the current tasks.
    pub fn plan_request(&self, available_minutes: u32) -> Result<PlanRequest, PlannerError> {
        PlanRequest::new(available_minutes, self.tasks.labels())
    }

    /// Replace today's plan with freshly planned blocks.
    pub fn apply_plan(&mut self, blocks: Vec<PlannedBlock>) {
        self.touch();
        self.plan = DayPlan::new(blocks);
        self.refresh_plan();
        self.notifier
            .notify(Notification::BlockText(PLAN_READY.to_string()));
    }

    /// Surface a collaborator failure without disturbing the timer.
    pub fn report_error(&mut self, err: &dyn std::error::Error) {
        tracing::warn!(error = %err, "collaborator failed");
        self.notifier.notify(Notification::Error(err.to_string()));
    }

    /// Start the next unfinished plan block. No-op without a plan.
    pub fn start_next_block(&mut self) -> Option<Event> {
        self.touch();
        if self.plan.is_empty() {
            return None;
        }
        let Some(block) = self.plan.advance() else {
            self.notifier
                .notify(Notification::BlockText(ALL_BLOCKS_DONE.to_string()));
            return None;
        };
        let (title, minutes) = (block.task_title.clone(), block.duration_min);
        self.notifier
            .notify(Notification::BlockText(format!("{title} - {minutes} min")));
        let event = self.engine.start_block(minutes, title);
        self.refresh_display();
        self.refresh_presence();
        event
    }

    /// Start a micro session on the first pending task.
    pub fn start_micro_session(&mut self) -> Option<Event> {
        self.touch();
        let label = self
            .tasks
            .first_pending()
            .map(|t| t.text.clone())
            .unwrap_or_else(|| FALLBACK_TASK.to_string());
        let minutes = self.engine.durations().minutes(Mode::Micro);
        self.notifier
            .notify(Notification::BlockText(format!("Micro: {label} - {minutes} min")));
        let previous = self.engine.mode();
        let event = self.engine.start_micro(label);
        if previous != Mode::Micro {
            self.notifier.notify(Notification::ModeChanged(Mode::Micro));
        }
        self.refresh_display();
        self.refresh_presence();
        event
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, text: &str) -> Result<()> {
        self.touch();
        self.tasks.add(text)?;
        self.refresh_tasks();
        Ok(())
    }

    pub fn set_task_completed(&mut self, index: usize, completed: bool) -> Result<()> {
        self.touch();
        self.tasks.set_completed(index, completed)?;
        self.refresh_tasks();
        Ok(())
    }

    pub fn remove_task(&mut self, index: usize) -> Result<()> {
        self.touch();
        self.tasks.remove(index)?;
        self.refresh_tasks();
        Ok(())
    }

    // ── Chat and room ────────────────────────────────────────────────

    pub fn ask(&mut self, question: &str) {
        self.touch();
        for message in self.chat.ask(question) {
            self.notifier.notify(Notification::Chat {
                speaker: message.speaker.as_str().to_string(),
                text: message.text.clone(),
            });
        }
    }

    pub fn join_room(&mut self, code: &str) {
        self.touch();
        let presence = self.presence();
        if let Some(room) = Room::join(code, MEMBER_NAME, presence) {
            self.room = Some(room);
            self.refresh_room();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn handle_completion(&mut self, is_focus_type: bool) {
        self.refresh_dots();
        self.notifier.notify(Notification::Overlay(true));
        if let Err(e) = self.habits.record_completion(is_focus_type) {
            tracing::error!(error = %e, "failed to persist habit stats");
            self.notifier.notify(Notification::Error(e.to_string()));
        }
        self.refresh_habits();
        self.notifier
            .notify(Notification::Celebrate(CELEBRATION.to_string()));
        if self.plan.finish_current() {
            self.refresh_plan();
        }
        self.refresh_presence();
    }

    fn touch(&mut self) {
        self.idle.touch(Utc::now());
    }

    fn presence(&self) -> Presence {
        Presence::from_timer(self.engine.mode(), self.engine.is_running())
    }

    fn refresh_display(&mut self) {
        self.notifier
            .notify(Notification::Display(self.engine.display()));
    }

    fn refresh_dots(&mut self) {
        self.notifier.notify(Notification::SessionDots {
            filled: filled_dots(self.engine.sessions_completed(), self.dots),
            total: self.dots,
        });
    }

    fn refresh_habits(&mut self) {
        self.notifier
            .notify(Notification::Habits(self.habits.record().clone()));
    }

    fn refresh_tasks(&mut self) {
        self.notifier
            .notify(Notification::Tasks(self.tasks.tasks().to_vec()));
    }

    fn refresh_plan(&mut self) {
        self.notifier
            .notify(Notification::Plan(self.plan.blocks().to_vec()));
    }

    fn refresh_presence(&mut self) {
        let presence = self.presence();
        let changed = self
            .room
            .as_mut()
            .is_some_and(|room| room.set_presence(presence));
        if changed {
            self.refresh_room();
        }
    }

    fn refresh_room(&mut self) {
        if let Some(room) = &self.room {
            self.notifier.notify(Notification::Room {
                status: room.status_text(),
                members: room.member_lines(),
            });
        }
    }
}
