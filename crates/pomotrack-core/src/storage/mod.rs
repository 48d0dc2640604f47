mod config;
pub mod database;
mod memory;

pub use config::{Config, IdleConfig, PlannerConfig, UiConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{CoreError, DatabaseError};

/// Local key-value storage holding one JSON blob per key.
///
/// Writes overwrite; there is no merge and no history.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).set(key, value)
    }
}

/// Returns `~/.config/pomotrack[-dev]/` based on POMOTRACK_ENV.
///
/// Set POMOTRACK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotrack-dev")
    } else {
        base_dir.join("pomotrack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
