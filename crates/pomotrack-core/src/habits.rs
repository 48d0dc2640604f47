//! XP, daily streak, and today's session count.
//!
//! The record lives in the `habitData` blob and is written through on every
//! completion. Only the latest day's snapshot is kept.
//!
//! Day transitions on load:
//!
//! | stored `lastDate`        | dayStreak        | sessionsToday | xp   |
//! |--------------------------|------------------|---------------|------|
//! | today                    | stored (min 1)   | stored        | kept |
//! | yesterday                | stored + 1       | 0             | kept |
//! | older, future, or absent | 1                | 0             | kept |
//! | no record at all         | 1                | 0             | 0    |

use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::Result;
use crate::storage::KeyValueStore;

pub const HABIT_KEY: &str = "habitData";
pub const FOCUS_XP: u64 = 10;
pub const LIGHT_XP: u64 = 4;

/// Format written by older front ends, e.g. `Mon Oct 19 2026`.
const LEGACY_DATE_FORMAT: &str = "%a %b %d %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub xp: u64,
    pub day_streak: u32,
    pub sessions_today: u32,
    pub last_date: NaiveDate,
}

impl HabitRecord {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            xp: 0,
            day_streak: 1,
            sessions_today: 0,
            last_date: today,
        }
    }

    /// Move the record onto `today`, advancing or breaking the streak.
    /// Does nothing if the record is already stamped with `today`.
    fn roll_over(&mut self, today: NaiveDate) {
        if self.last_date == today {
            return;
        }
        self.day_streak = if self.last_date.succ_opt() == Some(today) {
            self.day_streak.saturating_add(1)
        } else {
            1
        };
        self.sessions_today = 0;
        self.last_date = today;
    }
}

/// Stored blob with every field optional, so partial records default-fill.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredHabits {
    xp: Option<u64>,
    day_streak: Option<u32>,
    sessions_today: Option<u32>,
    last_date: Option<String>,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, LEGACY_DATE_FORMAT))
        .ok()
}

/// Apply the load-time day transition to whatever was stored.
fn carry_forward(stored: Option<StoredHabits>, today: NaiveDate) -> HabitRecord {
    let Some(stored) = stored else {
        return HabitRecord::fresh(today);
    };
    let xp = stored.xp.unwrap_or(0);

    let Some(last_date) = stored.last_date.as_deref().and_then(parse_date) else {
        return HabitRecord { xp, ..HabitRecord::fresh(today) };
    };

    if last_date == today {
        return HabitRecord {
            xp,
            day_streak: stored.day_streak.filter(|&s| s > 0).unwrap_or(1),
            sessions_today: stored.sessions_today.unwrap_or(0),
            last_date,
        };
    }

    let mut record = HabitRecord {
        xp,
        day_streak: stored.day_streak.unwrap_or(0),
        sessions_today: 0,
        last_date,
    };
    record.roll_over(today);
    record
}

/// Owns the habit record and writes it through to storage.
pub struct HabitTracker {
    record: HabitRecord,
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
}

impl HabitTracker {
    /// Read the persisted record and apply the day transition.
    ///
    /// Missing, unreadable, or malformed data is treated as absent.
    pub fn load(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        let today = clock.today();
        let stored = match store.get(HABIT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<StoredHabits>(&raw) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed habit data");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read habit data");
                None
            }
        };
        let record = carry_forward(stored, today);
        tracing::debug!(?record, "habit record loaded");
        Self {
            record,
            store,
            clock,
        }
    }

    pub fn record(&self) -> &HabitRecord {
        &self.record
    }

    /// Credit a completed session and persist immediately.
    ///
    /// Focus-type sessions earn [`FOCUS_XP`] and count towards today's
    /// sessions; anything else earns [`LIGHT_XP`] only. If the day changed
    /// since the record was loaded, the day transition is applied first.
    pub fn record_completion(&mut self, is_focus_type: bool) -> Result<&HabitRecord> {
        self.record.roll_over(self.clock.today());
        if is_focus_type {
            self.record.xp = self.record.xp.saturating_add(FOCUS_XP);
            self.record.sessions_today = self.record.sessions_today.saturating_add(1);
        } else {
            self.record.xp = self.record.xp.saturating_add(LIGHT_XP);
        }
        tracing::info!(
            xp = self.record.xp,
            sessions_today = self.record.sessions_today,
            day_streak = self.record.day_streak,
            "habit stats updated"
        );
        self.save()?;
        Ok(&self.record)
    }

    /// Overwrite the stored record, stamped with today's date.
    pub fn save(&mut self) -> Result<()> {
        self.record.last_date = self.clock.today();
        let json = serde_json::to_string(&self.record)?;
        self.store.set(HABIT_KEY, &json)?;
        Ok(())
    }
}
