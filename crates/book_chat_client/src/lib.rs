//! Shared book chat client library (config, HTTP wire messages, transport).
//! Used by the terminal chat front-end.

pub mod client;
pub mod config;
pub mod messages;

pub use client::{ChatClient, ChatTransport, ClientError};
pub use config::{default_config_path, ApiSection, Config, ConfigError, UiSection};
pub use messages::ChatReply;
