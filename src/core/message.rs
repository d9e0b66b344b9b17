use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::ChatMessage;

/// Fallback reply appended when the chat endpoint cannot produce one.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptRole {
    User,
    Assistant,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for TranscriptRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(TranscriptRole::User),
            "assistant" => Ok(TranscriptRole::Assistant),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for TranscriptRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<TranscriptRole> for String {
    fn from(value: TranscriptRole) -> Self {
        value.as_str().to_string()
    }
}

/// Session-unique message identifier derived from wall-clock milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out strictly increasing ids. Two messages created within the same
/// millisecond (a user message and an instant error reply) still differ.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: u64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> MessageId {
        let now = Local::now().timestamp_millis().max(0) as u64;
        self.next_id_at(now)
    }

    fn next_id_at(&mut self, millis: u64) -> MessageId {
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        MessageId(id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: TranscriptRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(
        ids: &mut MessageIdGenerator,
        role: TranscriptRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: ids.next_id(),
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(ids: &mut MessageIdGenerator, content: impl Into<String>) -> Self {
        Self::new(ids, TranscriptRole::User, content)
    }

    pub fn assistant(ids: &mut MessageIdGenerator, content: impl Into<String>) -> Self {
        Self::new(ids, TranscriptRole::Assistant, content)
    }

    pub fn fallback(ids: &mut MessageIdGenerator) -> Self {
        Self::assistant(ids, FALLBACK_REPLY)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }

    /// Reduce to the wire shape; ids and timestamps never leave the client.
    pub fn to_api_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role.as_str().to_string(),
            content: self.content.clone(),
        }
    }
}
