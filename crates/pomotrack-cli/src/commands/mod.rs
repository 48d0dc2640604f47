pub mod config;
pub mod habits;
pub mod plan;
pub mod run;
pub mod task;

use std::rc::Rc;

use pomotrack_core::{Database, KeyValueStore};

/// Open the on-disk store shared by every command.
pub fn open_store() -> Result<Rc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    Ok(Rc::new(Database::open()?))
}
