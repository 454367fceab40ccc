//! Terminal chat front-end for asking questions about a book.
//! The view is a plain state machine; `app` wires it to stdin/stdout and the HTTP client.

pub mod app;
pub mod conversation;
pub mod render;
pub mod view;

pub use conversation::{Conversation, Message, MessageId};
pub use view::{ChatView, ExchangeOutcome, Notice, ViewState, FAILED_NOTICE};
