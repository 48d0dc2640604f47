use std::cell::Cell;

use chrono::{Local, NaiveDate};

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable date for tests.
#[derive(Debug)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Cell::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        self.today.set(today);
    }

    /// Move forward by `days` calendar days.
    pub fn advance_days(&self, days: u64) {
        let next = self
            .today
            .get()
            .checked_add_days(chrono::Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        self.today.set(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}
