//! Wire payloads for the chat proxy's `/api/chat` endpoint.

use serde::{Deserialize, Serialize};

/// Path of the chat endpoint, relative to the configured base URL.
pub const CHAT_ENDPOINT_PATH: &str = "api/chat";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
}

/// Success body. `content` stays optional so a 2xx reply without it can be
/// told apart from a body that is not JSON at all.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub content: Option<String>,
}
