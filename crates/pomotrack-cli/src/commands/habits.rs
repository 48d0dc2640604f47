use std::rc::Rc;

use clap::Subcommand;
use pomotrack_core::{HabitTracker, SystemClock};

use super::open_store;

#[derive(Subcommand)]
pub enum HabitsAction {
    /// Print XP, streak and today's sessions as JSON
    Show,
}

pub fn run(action: HabitsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    match action {
        HabitsAction::Show => {
            let tracker = HabitTracker::load(store, Rc::new(SystemClock));
            println!("{}", serde_json::to_string_pretty(tracker.record())?);
        }
    }
    Ok(())
}
