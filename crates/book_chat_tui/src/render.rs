//! Plain-text rendering of the conversation.
//!
//! Rendering is a pure function of the conversation and the page labels, so the
//! same state always produces the same transcript.

use std::fmt::{Display, Write as _};

use book_chat_client::Config;
use chrono::{Local, TimeZone};

use crate::conversation::{Conversation, Message};

const USER_LABEL: &str = "You";
const BOT_LABEL: &str = "Bot";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Static labels around the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    /// Shown while the conversation is empty.
    pub hint: String,
    pub prompt: String,
}

impl Page {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.title().to_string(),
            hint: format!(
                "Ask me anything about \"{}\" by {}",
                config.book(),
                config.author()
            ),
            prompt: format!("Ask about {}' book...", config.author()),
        }
    }
}

pub fn render_header(page: &Page) -> String {
    let rule = "=".repeat(page.title.chars().count());
    format!("{}\n{}\n", page.title, rule)
}

/// Render one message using the local time zone.
pub fn render_message(message: &Message) -> String {
    render_message_in(message, &Local)
}

/// Render one message with its timestamp shown in `tz`.
pub fn render_message_in<Tz>(message: &Message, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let label = if message.is_bot { BOT_LABEL } else { USER_LABEL };
    let time = message.timestamp.with_timezone(tz).format(TIME_FORMAT);

    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", label, time);
    for line in message.content.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    if message.content.is_empty() {
        out.push('\n');
    }
    if message.is_bot && !message.sources.is_empty() {
        let _ = writeln!(out, "  Sources: {}", message.sources.join(", "));
    }
    out
}

/// Render the whole transcript (or the hint when empty) using the local time zone.
pub fn render_transcript(conversation: &Conversation, page: &Page) -> String {
    render_transcript_in(conversation, page, &Local)
}

pub fn render_transcript_in<Tz>(conversation: &Conversation, page: &Page, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if conversation.is_empty() {
        return format!("{}\n", page.hint);
    }
    conversation
        .messages()
        .iter()
        .map(|m| render_message_in(m, tz))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notice(notice: &str) -> String {
    format!("! {}\n", notice)
}
