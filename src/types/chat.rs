//! Conversation wire types
//!
//! A request is an ordered, chronological sequence of messages; everything
//! before the last message is history and the last message is the pending
//! user turn.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The customer
    User,
    /// The assistant
    Assistant,
}

/// A single conversation turn, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequestBody {
    /// Full conversation, oldest first; last element is the pending turn
    pub messages: Vec<ChatMessage>,
}

/// Split a conversation into (history, pending question)
///
/// Enforces the request invariant: the sequence is non-empty and its last
/// element is a user turn.
pub fn split_conversation(messages: &[ChatMessage]) -> Result<(&[ChatMessage], &str)> {
    let last = messages
        .last()
        .ok_or_else(|| Error::validation("Conversation must contain at least one message"))?;

    if last.role != Role::User {
        return Err(Error::validation(
            "Last message in a conversation must be a user turn",
        ));
    }

    let history = &messages[..messages.len() - 1];
    Ok((history, &last.content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_history_from_pending_turn() {
        let messages = vec![
            ChatMessage::user("Show me snacks"),
            ChatMessage::assistant("Here are some snacks..."),
            ChatMessage::user("Which is cheapest?"),
        ];

        let (history, question) = split_conversation(&messages).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(question, "Which is cheapest?");
    }

    #[test]
    fn rejects_empty_conversation() {
        assert!(split_conversation(&[]).is_err());
    }

    #[test]
    fn rejects_trailing_assistant_turn() {
        let messages = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        assert!(split_conversation(&messages).is_err());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }
}
