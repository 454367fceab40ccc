//! HTTP message types for `POST /chat`. Client ↔ server JSON.

use serde::{Deserialize, Serialize};

/// Client → server: chat request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub query: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }
}

/// Server → client: chat reply body. `sources` may be absent or null.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

/// Normalized answer handed to the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub message: String,
    pub sources: Vec<String>,
}

impl From<ChatResponse> for ChatReply {
    fn from(r: ChatResponse) -> Self {
        Self {
            message: r.response,
            sources: r.sources.unwrap_or_default(),
        }
    }
}
