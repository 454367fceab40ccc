//! Terminal front-end: config resolution, the interactive session loop and one-shot asks.
//! Everything here is generic over the transport and the I/O handles so tests can drive it.

use std::io::Write;
use std::path::Path;

use book_chat_client::{config, ChatReply, ChatTransport, ClientError, Config, ConfigError};
use futures_util::future::{Fuse, FusedFuture, LocalBoxFuture, OptionFuture};
use futures_util::FutureExt;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;

use crate::render::{self, Page};
use crate::view::{ChatView, ExchangeOutcome};

const BUSY_HINT: &str = "(still waiting for the previous answer)";
const THINKING: &str = "...";

/// Front-end error. Exchange failures are not errors here; the view reports them as notices.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the config named on the command line (or via env), else the default file if present.
///
/// An explicitly named file must exist; a missing default file means built-in defaults.
pub fn load_config(explicit: Option<&Path>, base_url: Option<&str>) -> Result<Config, ConfigError> {
    let mut cfg = match explicit {
        Some(path) => config::load(path)?,
        None => match config::default_config_path() {
            Some(path) => config::load_or_default(&path)?,
            None => {
                tracing::debug!("no home directory, using default config");
                Config::default()
            }
        },
    };
    if let Some(url) = base_url {
        cfg.api.base_url = Some(url.to_string());
    }
    Ok(cfg)
}

/// Write every message appended since the last call.
fn flush_messages<W: Write>(view: &mut ChatView, out: &mut W) -> std::io::Result<()> {
    for message in view.advance_scroll() {
        write!(out, "{}", render::render_message(message))?;
    }
    out.flush()
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim(), "/quit" | "/exit")
}

/// Interactive session: one question per input line until EOF or `/quit`.
///
/// Input keeps being read while an answer is outstanding, but lines arriving
/// then are dropped. An outstanding request is always allowed to finish.
pub async fn run_session<T, R, W>(
    transport: &T,
    page: &Page,
    input: R,
    out: &mut W,
) -> Result<ChatView, AppError>
where
    T: ChatTransport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut view = ChatView::new();
    let mut lines = input.lines();
    let mut pending: OptionFuture<Fuse<LocalBoxFuture<'_, Result<ChatReply, ClientError>>>> =
        None.into();
    let mut input_open = true;

    write!(out, "{}", render::render_header(page))?;
    write!(out, "{}", render::render_transcript(view.conversation(), page))?;
    writeln!(out, "{} (/quit to leave)", page.prompt)?;
    out.flush()?;

    loop {
        if !input_open && pending.is_terminated() {
            break;
        }
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    tracing::debug!("input closed");
                    input_open = false;
                    continue;
                };
                if is_quit(&line) {
                    input_open = false;
                    continue;
                }
                if view.is_busy() {
                    writeln!(out, "{}", BUSY_HINT)?;
                    continue;
                }
                view.set_input(line);
                if let Some(query) = view.begin_send() {
                    flush_messages(&mut view, out)?;
                    writeln!(out, "{}", THINKING)?;
                    out.flush()?;
                    pending = Some(
                        async move { transport.send_message(&query).await }
                            .boxed_local()
                            .fuse(),
                    )
                    .into();
                }
            }
            Some(result) = &mut pending, if !pending.is_terminated() => {
                pending = None.into();
                view.complete(result);
                flush_messages(&mut view, out)?;
                if let Some(notice) = view.dismiss_notice() {
                    write!(out, "{}", render::render_notice(&notice.message))?;
                    out.flush()?;
                }
            }
        }
    }
    Ok(view)
}

/// Ask a single question and render the exchange.
///
/// The returned view still holds any failure notice so the caller can report it.
pub async fn ask_once<T, W>(
    transport: &T,
    question: &str,
    out: &mut W,
) -> Result<(ChatView, ExchangeOutcome), AppError>
where
    T: ChatTransport,
    W: Write,
{
    let mut view = ChatView::new();
    view.set_input(question);
    let outcome = view.send(transport).await;
    flush_messages(&mut view, out)?;
    Ok((view, outcome))
}
