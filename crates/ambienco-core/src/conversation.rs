use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The role of the participant that authored a [`ChatMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A site visitor.
    User,
    /// The lighting assistant.
    Assistant,
}

/// A single turn exchanged with the assistant widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier for this message.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// The author of the message. Older widget payloads call this `type`.
    #[serde(alias = "type")]
    pub role: Role,
    /// The textual content of the message.
    pub content: String,
    /// UTC timestamp of when the message was created.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Set when the visitor marked an assistant answer as helpful.
    #[serde(default)]
    pub helpful: bool,
}

impl ChatMessage {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            helpful: false,
        }
    }

    /// Creates a new message with [`Role::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new message with [`Role::Assistant`].
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Transcript of one assistant chat session, kept for analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// The chat session this transcript belongs to.
    pub session_id: Uuid,
    /// All turns, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Free-form client information (user agent, language).
    #[serde(default)]
    pub user_info: HashMap<String, serde_json::Value>,
    /// When the first turn was stored.
    pub created_at: DateTime<Utc>,
    /// When the transcript was last written.
    pub last_updated: DateTime<Utc>,
}

impl Conversation {
    /// Creates an empty transcript for `session_id`.
    pub fn new(session_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            messages: Vec::new(),
            user_info: HashMap::new(),
            created_at: now,
            last_updated: now,
        }
    }

    /// Appends a turn and bumps `last_updated`.
    pub fn push(&mut self, message: ChatMessage) {
        self.last_updated = Utc::now();
        self.messages.push(message);
    }

    /// Replaces the turns wholesale, as the widget re-sends its full history.
    pub fn replace_messages(&mut self, messages: Vec<ChatMessage>) {
        self.last_updated = Utc::now();
        self.messages = messages;
    }

    /// Marks an assistant message as helpful.
    ///
    /// Returns `false` if no assistant message has that id.
    pub fn mark_helpful(&mut self, message_id: Uuid) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|m| m.id == message_id && m.role == Role::Assistant)
        {
            Some(msg) => {
                msg.helpful = true;
                self.last_updated = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Iterates over the content of every visitor turn.
    pub fn user_questions(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User && !m.content.is_empty())
            .map(|m| m.content.as_str())
    }

    /// Number of turns in the transcript.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(!msg.helpful);
    }

    #[test]
    fn test_widget_payload_uses_type_field() {
        let json = r#"{"type": "assistant", "content": "Hi there"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_mark_helpful_only_on_assistant_turns() {
        let mut conv = Conversation::new(Uuid::new_v4());
        let question = ChatMessage::user("price?");
        let answer = ChatMessage::assistant("cheap");
        let (qid, aid) = (question.id, answer.id);
        conv.push(question);
        conv.push(answer);

        assert!(!conv.mark_helpful(qid));
        assert!(conv.mark_helpful(aid));
        assert!(conv.messages[1].helpful);
        assert!(!conv.mark_helpful(Uuid::new_v4()));
    }

    #[test]
    fn test_user_questions_skips_assistant_turns() {
        let mut conv = Conversation::new(Uuid::new_v4());
        conv.push(ChatMessage::user("one"));
        conv.push(ChatMessage::assistant("answer"));
        conv.push(ChatMessage::user("two"));
        let questions: Vec<&str> = conv.user_questions().collect();
        assert_eq!(questions, vec!["one", "two"]);
        assert_eq!(conv.message_count(), 3);
    }
}
