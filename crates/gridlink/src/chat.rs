//! The session chat log.

use serde::{Deserialize, Serialize};

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Dm,
}

/// One chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Append-only conversation history between the player and the DM.
/// Session-memory only — discarded with the session.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_dm(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::Dm,
            content: content.into(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order_and_roles() {
        let mut chat = ChatLog::new();
        chat.push_user("Hello Dungeon Master");
        chat.push_dm("Welcome, traveler.");

        assert_eq!(chat.len(), 2);
        assert_eq!(chat.messages()[0].role, Role::User);
        assert_eq!(chat.messages()[1].role, Role::Dm);
        assert_eq!(chat.last().unwrap().content, "Welcome, traveler.");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Dm).unwrap(), "\"dm\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
