//! UI side effects requested by the dashboard.
//!
//! Each front end implements [`Notifier`] and renders the notifications
//! however it likes.

use crate::habits::HabitRecord;
use crate::plan::PlanBlock;
use crate::tasks::Task;
use crate::timer::Mode;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Remaining time as `MM:SS`.
    Display(String),
    ModeChanged(Mode),
    /// Break overlay shown (`true`) or hidden.
    Overlay(bool),
    SessionDots { filled: usize, total: usize },
    Habits(HabitRecord),
    /// Completion message for the user.
    Celebrate(String),
    /// "Current block" line.
    BlockText(String),
    Plan(Vec<PlanBlock>),
    Tasks(Vec<Task>),
    Chat { speaker: String, text: String },
    Room { status: String, members: Vec<String> },
    /// A collaborator failed; the timer carries on.
    Error(String),
}

pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent display string, if any.
    pub fn last_display(&self) -> Option<&str> {
        self.notifications.iter().rev().find_map(|n| match n {
            Notification::Display(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&Notification) -> bool) -> usize {
        self.notifications.iter().filter(|n| pred(n)).count()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Dots lit after `completed` sessions on a row of `total`.
///
/// The row fills up and then starts over: with 4 dots, the 5th session
/// lights one dot again.
pub fn filled_dots(completed: u32, total: usize) -> usize {
    if completed == 0 || total == 0 {
        return 0;
    }
    (completed as usize - 1) % total + 1
}
