//! Study-assistant chat. There is no backend yet: every question gets the
//! same placeholder answer.

use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_REPLY: &str =
    "This is where the AI's concise explanation or summary will appear.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record a question and the reply. Blank questions are ignored.
    ///
    /// Returns the new messages (question, then reply).
    pub fn ask(&mut self, question: &str) -> &[ChatMessage] {
        let question = question.trim();
        if question.is_empty() {
            return &[];
        }
        let start = self.messages.len();
        self.messages.push(ChatMessage {
            speaker: Speaker::User,
            text: question.to_string(),
        });
        self.messages.push(ChatMessage {
            speaker: Speaker::Bot,
            text: PLACEHOLDER_REPLY.to_string(),
        });
        &self.messages[start..]
    }
}
