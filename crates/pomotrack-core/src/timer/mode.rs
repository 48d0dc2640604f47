use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named countdown preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Short,
    Long,
    Deep,
    Micro,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Focus, Mode::Short, Mode::Long, Mode::Deep, Mode::Micro];

    /// Built-in duration in minutes.
    pub fn default_minutes(self) -> u32 {
        match self {
            Mode::Focus => 25,
            Mode::Short => 5,
            Mode::Long => 15,
            Mode::Deep => 50,
            Mode::Micro => 5,
        }
    }

    /// Focus-type sessions earn full XP and count towards today's sessions.
    pub fn is_focus_type(self) -> bool {
        matches!(self, Mode::Focus | Mode::Deep)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Short => "short",
            Mode::Long => "long",
            Mode::Deep => "deep",
            Mode::Micro => "micro",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(Mode::Focus),
            "short" => Ok(Mode::Short),
            "long" => Ok(Mode::Long),
            "deep" => Ok(Mode::Deep),
            "micro" => Ok(Mode::Micro),
            other => Err(format!(
                "unknown mode '{other}' (expected focus, short, long, deep or micro)"
            )),
        }
    }
}

/// Per-mode durations in minutes.
///
/// Serialized as the `[modes]` table of the config file. Every field falls
/// back to [`Mode::default_minutes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    #[serde(default = "default_focus")]
    pub focus: u32,
    #[serde(default = "default_short")]
    pub short: u32,
    #[serde(default = "default_long")]
    pub long: u32,
    #[serde(default = "default_deep")]
    pub deep: u32,
    #[serde(default = "default_micro")]
    pub micro: u32,
}

fn default_focus() -> u32 {
    Mode::Focus.default_minutes()
}
fn default_short() -> u32 {
    Mode::Short.default_minutes()
}
fn default_long() -> u32 {
    Mode::Long.default_minutes()
}
fn default_deep() -> u32 {
    Mode::Deep.default_minutes()
}
fn default_micro() -> u32 {
    Mode::Micro.default_minutes()
}

impl ModeDurations {
    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus,
            Mode::Short => self.short,
            Mode::Long => self.long,
            Mode::Deep => self.deep,
            Mode::Micro => self.micro,
        }
    }
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short: default_short(),
            long: default_long(),
            deep: default_deep(),
            micro: default_micro(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations_match_presets() {
        let d = ModeDurations::default();
        assert_eq!(d.minutes(Mode::Focus), 25);
        assert_eq!(d.minutes(Mode::Short), 5);
        assert_eq!(d.minutes(Mode::Long), 15);
        assert_eq!(d.minutes(Mode::Deep), 50);
        assert_eq!(d.minutes(Mode::Micro), 5);
    }

    #[test]
    fn only_focus_and_deep_are_focus_type() {
        let focus: Vec<Mode> = Mode::ALL.into_iter().filter(|m| m.is_focus_type()).collect();
        assert_eq!(focus, vec![Mode::Focus, Mode::Deep]);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Deep".parse::<Mode>().unwrap(), Mode::Deep);
        assert_eq!(" micro ".parse::<Mode>().unwrap(), Mode::Micro);
        assert!("nap".parse::<Mode>().is_err());
    }

    #[test]
    fn partial_table_fills_defaults() {
        let d: ModeDurations = toml::from_str("focus = 30").unwrap();
        assert_eq!(d.focus, 30);
        assert_eq!(d.deep, 50);
    }
}
