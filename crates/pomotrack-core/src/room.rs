//! Study room presence. Local only: joining a room lists just this user.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timer::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Focusing,
    Break,
    Idle,
}

impl Presence {
    pub fn from_timer(mode: Mode, running: bool) -> Self {
        match (running, mode.is_focus_type()) {
            (false, _) => Presence::Idle,
            (true, true) => Presence::Focusing,
            (true, false) => Presence::Break,
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Presence::Focusing => "Focusing",
            Presence::Break => "Break",
            Presence::Idle => "Idle",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub presence: Presence,
}

#[derive(Debug, Clone)]
pub struct Room {
    code: String,
    members: Vec<Member>,
}

impl Room {
    /// Join the room `code` as `name`. Blank codes are ignored.
    pub fn join(code: &str, name: &str, presence: Presence) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        tracing::debug!(%code, "joined room");
        Some(Self {
            code: code.to_string(),
            members: vec![Member {
                name: name.to_string(),
                presence,
            }],
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn status_text(&self) -> String {
        format!("In room: {}", self.code)
    }

    /// Member lines as shown in the room list.
    pub fn member_lines(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| format!("{} - {}", m.name, m.presence))
            .collect()
    }

    /// Update this user's presence. Returns true if it changed.
    pub fn set_presence(&mut self, presence: Presence) -> bool {
        match self.members.first_mut() {
            Some(me) if me.presence != presence => {
                me.presence = presence;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_follows_timer() {
        assert_eq!(Presence::from_timer(Mode::Deep, true), Presence::Focusing);
        assert_eq!(Presence::from_timer(Mode::Short, true), Presence::Break);
        assert_eq!(Presence::from_timer(Mode::Focus, false), Presence::Idle);
    }

    #[test]
    fn join_lists_self() {
        let room = Room::join(" study-42 ", "You", Presence::Idle).unwrap();
        assert_eq!(room.status_text(), "In room: study-42");
        assert_eq!(room.member_lines(), vec!["You - Idle".to_string()]);
        assert_eq!(room.code(), "study-42");
        assert_eq!(room.members().len(), 1);
    }

    #[test]
    fn blank_code_is_ignored() {
        assert!(Room::join("", "You", Presence::Idle).is_none());
    }

    #[test]
    fn presence_change_is_reported_once() {
        let mut room = Room::join("r", "You", Presence::Idle).unwrap();
        assert!(room.set_presence(Presence::Focusing));
        assert!(!room.set_presence(Presence::Focusing));
    }
}
