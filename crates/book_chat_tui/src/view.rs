//! Chat view state machine.
//!
//! The view owns the conversation, the input buffer and the exchange state.
//! Front-ends drive it with [`ChatView::begin_send`] and [`ChatView::complete`]
//! (or [`ChatView::send`] when they can simply await), then draw whatever
//! [`ChatView::advance_scroll`] and [`ChatView::dismiss_notice`] hand out.

use book_chat_client::{ChatReply, ChatTransport, ClientError};

use crate::conversation::{Conversation, Message};

/// Text of the transient notification shown when an exchange fails.
pub const FAILED_NOTICE: &str = "Failed to send message";

/// Exchange state. Only `AwaitingResponse` counts as busy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    AwaitingResponse { query: String },
    ErrorShown(Notice),
}

/// A failure notice plus the error that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub cause: String,
}

/// What a send or completion did to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Nothing happened: blank input, busy view, or a stray completion.
    Skipped,
    /// The bot answer was appended.
    Answered,
    /// The exchange failed; a notice is pending.
    Failed,
}

#[derive(Debug, Default)]
pub struct ChatView {
    conversation: Conversation,
    input: String,
    state: ViewState,
    scroll: usize,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, ViewState::AwaitingResponse { .. })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Start an exchange from the input buffer.
    ///
    /// Returns the query to dispatch, or `None` when the buffer is blank or an
    /// exchange is already in flight. On `Some`, the user message has been
    /// appended and the buffer cleared.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.is_busy() || self.input.trim().is_empty() {
            return None;
        }
        let query = std::mem::take(&mut self.input);
        self.conversation.push(Message::user(query.clone()));
        self.state = ViewState::AwaitingResponse {
            query: query.clone(),
        };
        Some(query)
    }

    /// Apply the transport result of the exchange started by `begin_send`.
    pub fn complete(&mut self, result: Result<ChatReply, ClientError>) -> ExchangeOutcome {
        let ViewState::AwaitingResponse { query } = &self.state else {
            tracing::warn!("completion arrived with no exchange in flight, ignoring");
            return ExchangeOutcome::Skipped;
        };
        match result {
            Ok(reply) => {
                tracing::debug!(%query, sources = reply.sources.len(), "answer received");
                self.conversation
                    .push(Message::bot(reply.message, reply.sources));
                self.state = ViewState::Idle;
                ExchangeOutcome::Answered
            }
            Err(e) => {
                tracing::debug!(%query, error = %e, "exchange failed");
                self.state = ViewState::ErrorShown(Notice {
                    message: FAILED_NOTICE.to_string(),
                    cause: e.to_string(),
                });
                ExchangeOutcome::Failed
            }
        }
    }

    /// Run one whole exchange against `transport`.
    pub async fn send<T: ChatTransport>(&mut self, transport: &T) -> ExchangeOutcome {
        let Some(query) = self.begin_send() else {
            return ExchangeOutcome::Skipped;
        };
        let result = transport.send_message(&query).await;
        self.complete(result)
    }

    /// Hand out the pending failure notice once and return to idle.
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        match std::mem::take(&mut self.state) {
            ViewState::ErrorShown(notice) => Some(notice),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Messages appended since the last call; the scroll position moves to the newest one.
    pub fn advance_scroll(&mut self) -> &[Message] {
        let start = self.scroll;
        self.scroll = self.conversation.len();
        &self.conversation.messages()[start..]
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll
    }
}
