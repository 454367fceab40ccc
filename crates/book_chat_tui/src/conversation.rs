//! Conversation model: append-only, ordered list of chat turns.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Opaque message identity, used only to tell rendered turns apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_bot: bool,
    /// Citations; always empty on user messages.
    pub sources: Vec<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            timestamp: Utc::now(),
            is_bot: false,
            sources: Vec::new(),
        }
    }

    pub fn bot(content: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            timestamp: Utc::now(),
            is_bot: true,
            sources,
        }
    }
}

/// Ordered chat history. Only [`Conversation::push`] changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
