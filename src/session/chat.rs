//! Append-only conversation log shown next to the avatar

use serde::Serialize;

pub const WELCOME_MESSAGE: &str =
    "Tell the avatar what to do, e.g. \"turn your head to the right\" or \"make it smile\".";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

/// An entry in the chat log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    /// A log seeded with the usage hint
    pub fn new() -> Self {
        let mut log = Self::empty();
        log.push_system(WELCOME_MESSAGE);
        log
    }

    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Role::User, text);
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.push(Role::System, text);
    }

    fn push(&mut self, role: Role, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            text: text.into(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
