//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Per-mode countdown durations
//! - The day-planning service address
//! - Idle nudge threshold
//! - Session dot count
//!
//! Configuration is stored at `~/.config/pomotrack/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::timer::ModeDurations;

/// Day-planning service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_planner_url")]
    pub base_url: String,
    /// Seconds before an unanswered planner request is abandoned.
    #[serde(default = "default_planner_timeout_secs")]
    pub timeout_secs: u64,
}

/// Idle nudge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_nudge_after_min")]
    pub nudge_after_min: u32,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_session_dots")]
    pub session_dots: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomotrack/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub modes: ModeDurations,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub idle: IdleConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_planner_url() -> String {
    "http://localhost:3000".into()
}
fn default_planner_timeout_secs() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_nudge_after_min() -> u32 {
    5
}
fn default_session_dots() -> u32 {
    4
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: default_planner_url(),
            timeout_secs: default_planner_timeout_secs(),
        }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            nudge_after_min: default_nudge_after_min(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            session_dots: default_session_dots(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole table".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Ok(Self::load_from(&Self::path()?)?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), CoreError> {
        Ok(self.save_to(&Self::path()?)?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, keeping the existing value's type.
    ///
    /// Does not persist; call `save` afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.modes, ModeDurations::default());
        assert_eq!(parsed.planner.base_url, "http://localhost:3000");
        assert_eq!(parsed.planner.timeout_secs, 10);
        assert_eq!(parsed.idle.nudge_after_min, 5);
        assert_eq!(parsed.ui.session_dots, 4);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.modes.focus, 25);
        assert!(cfg.idle.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("modes.deep").as_deref(), Some("50"));
        assert_eq!(cfg.get("idle.enabled").as_deref(), Some("true"));
        assert_eq!(
            cfg.get("planner.base_url").as_deref(),
            Some("http://localhost:3000")
        );
        assert!(cfg.get("modes.nap").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("modes.focus", "30").unwrap();
        assert_eq!(cfg.modes.focus, 30);
    }

    #[test]
    fn set_updates_nested_bool_and_string() {
        let mut cfg = Config::default();
        cfg.set("idle.enabled", "false").unwrap();
        cfg.set("planner.base_url", "http://planner.local:8080").unwrap();
        assert!(!cfg.idle.enabled);
        assert_eq!(cfg.planner.base_url, "http://planner.local:8080");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("modes.nap", "10"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "10"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("modes.focus", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("idle.enabled", "yes").is_err());
        assert!(cfg.set("modes", "1").is_err());
        assert_eq!(cfg.modes.focus, 25);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.modes.focus, 25);
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("modes.micro", "3").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.modes.micro, 3);
    }

    #[test]
    fn load_from_rejects_broken_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "modes = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
