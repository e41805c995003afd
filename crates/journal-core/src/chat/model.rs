//! Conversation message types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use uuid::Uuid;

/// Id of the greeting seeded into an empty conversation.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

const WELCOME_TEXT: &str = "Hello! I am your personal diary agent. How was your day? \
I can help you write your entry for today or find past memories.";

/// Represents the author of a chat message.
///
/// The lowercase names double as the role names of the generative API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant (or synthesized on its behalf).
    Model,
}

/// A single immutable message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id.
    pub id: String,
    /// The author of the message.
    pub role: MessageRole,
    /// The message text.
    pub text: String,
    /// Creation time (Unix timestamp in milliseconds).
    pub timestamp: i64,
}

impl ChatMessage {
    /// Creates a message with a fresh id and the current time.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Creates an assistant message.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Model, text)
    }

    /// The greeting shown when there is no conversation yet.
    pub fn welcome() -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            ..Self::model(WELCOME_TEXT)
        }
    }

    /// Moves the timestamp past `previous` so the conversation order
    /// survives a reload sorted by timestamp.
    pub fn stamped_after(mut self, previous: Option<&ChatMessage>) -> Self {
        if let Some(previous) = previous {
            self.timestamp = self.timestamp.max(previous.timestamp + 1);
        }
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(MessageRole::Model.as_ref(), "model");
    }

    #[test]
    fn test_new_messages_have_unique_ids() {
        let a = ChatMessage::user("one");
        let b = ChatMessage::user("one");
        assert_ne!(a.id, b.id);
        assert!(a.is_user());
    }

    #[test]
    fn test_stamped_after_orders_same_millisecond_messages() {
        let user = ChatMessage {
            timestamp: i64::MAX / 2,
            ..ChatMessage::user("hi")
        };
        let reply = ChatMessage::model("hello").stamped_after(Some(&user));
        assert_eq!(reply.timestamp, user.timestamp + 1);

        let earlier = ChatMessage {
            timestamp: 1,
            ..ChatMessage::user("old")
        };
        let fresh = ChatMessage::model("now");
        let stamped = fresh.clone().stamped_after(Some(&earlier));
        assert_eq!(stamped.timestamp, fresh.timestamp);
        assert_eq!(ChatMessage::user("x").stamped_after(None).role, MessageRole::User);
    }

    #[test]
    fn test_welcome_message() {
        let welcome = ChatMessage::welcome();
        assert_eq!(welcome.id, WELCOME_MESSAGE_ID);
        assert_eq!(welcome.role, MessageRole::Model);
        assert!(welcome.text.contains("diary agent"));
    }
}
