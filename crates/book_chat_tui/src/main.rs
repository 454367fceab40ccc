//! book-chat: terminal chat with a book Q&A service.
//! With no question argument it runs an interactive session on stdin/stdout;
//! with one it asks once and exits.

use std::path::PathBuf;
use std::process::ExitCode;

use book_chat_client::ChatClient;
use book_chat_tui::app::{self, AppError};
use book_chat_tui::render::{self, Page};
use book_chat_tui::ExchangeOutcome;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "book-chat", version, about = "Ask questions about a book from the terminal")]
struct Cli {
    /// Path to the YAML config file (default: ~/.book-chat/config.yaml)
    #[arg(long, env = "BOOK_CHAT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Chat service base URL, overrides the config file
    #[arg(long, env = "BOOK_CHAT_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Ask this question once and exit
    question: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let cfg = app::load_config(cli.config.as_deref(), cli.base_url.as_deref())?;
    let client = ChatClient::new(cfg.base_url())?;
    tracing::info!(base_url = client.base_url(), "using chat service");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.question.is_empty() {
        let page = Page::from_config(&cfg);
        let input = tokio::io::BufReader::new(tokio::io::stdin());
        app::run_session(&client, &page, input, &mut out).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let question = cli.question.join(" ");
    let (mut view, outcome) = app::ask_once(&client, &question, &mut out).await?;
    match outcome {
        ExchangeOutcome::Answered => Ok(ExitCode::SUCCESS),
        ExchangeOutcome::Failed => {
            if let Some(notice) = view.dismiss_notice() {
                eprint!("{}", render::render_notice(&notice.message));
                eprintln!("Error: query failed: {}", notice.cause);
            }
            Ok(ExitCode::FAILURE)
        }
        ExchangeOutcome::Skipped => {
            eprintln!("Error: no question provided");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
