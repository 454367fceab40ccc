//! Integration tests for the book-chat binary.
//! Runs the binary with assert_cmd against an in-process HTTP backend and real temp configs.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use predicates::prelude::*;
use std::io::Write as _;

/// Pick a free port by binding to :0 and extracting the assigned port.
fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Run an axum backend on its own thread; returns its base URL.
/// The thread lives until the test process exits.
fn spawn_backend(status: StatusCode, body: serde_json::Value) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let app = Router::new().route(
                "/chat",
                post(move |Json(_req): Json<serde_json::Value>| {
                    let body = body.clone();
                    async move { (status, Json(body)) }
                }),
            );
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://127.0.0.1:{}", port)
}

fn answering_backend() -> String {
    spawn_backend(
        StatusCode::OK,
        serde_json::json!({ "response": "It means...", "sources": ["Chapter 3"] }),
    )
}

/// Write a minimal YAML config pointing at `base_url`.
fn write_config(dir: &tempfile::TempDir, base_url: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        "api:\n  base_url: {}\nui:\n  title: Test Desk\n  book: Walden\n  author: Thoreau",
        base_url
    )
    .unwrap();
    path
}

/// Binary command isolated from the developer's own config and environment.
fn book_chat(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::from(cargo_bin_cmd!("book-chat"));
    cmd.env("HOME", home.path())
        .env("USERPROFILE", home.path())
        .env_remove("BOOK_CHAT_CONFIG")
        .env_remove("BOOK_CHAT_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn one_shot_question_prints_answer_and_sources() {
    let url = answering_backend();
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .arg("--base-url")
        .arg(&url)
        .arg("What is the 40% rule?")
        .assert()
        .success()
        .stdout(predicate::str::contains("What is the 40% rule?"))
        .stdout(predicate::str::contains("It means..."))
        .stdout(predicate::str::contains("Sources: Chapter 3"));
}

#[test]
fn one_shot_joins_question_words() {
    let url = answering_backend();
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .args(["--base-url", &url, "What", "is", "this?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  What is this?"));
}

#[test]
fn interactive_session_reads_stdin() {
    let url = answering_backend();
    let home = tempfile::tempdir().unwrap();
    let config_path = write_config(&home, &url);

    book_chat(&home)
        .arg("--config")
        .arg(&config_path)
        .write_stdin("What is the 40% rule?\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Desk"))
        .stdout(predicate::str::contains(
            "Ask me anything about \"Walden\" by Thoreau",
        ))
        .stdout(predicate::str::contains("It means..."));
}

#[test]
fn config_env_var_is_honoured() {
    let url = answering_backend();
    let home = tempfile::tempdir().unwrap();
    let config_path = write_config(&home, &url);

    book_chat(&home)
        .env("BOOK_CHAT_CONFIG", &config_path)
        .arg("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains("It means..."));
}

#[test]
fn default_config_file_in_home_is_used() {
    let url = answering_backend();
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".book-chat");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.yaml"), format!("api:\n  base_url: {}\n", url)).unwrap();

    book_chat(&home)
        .arg("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sources: Chapter 3"));
}

#[test]
fn server_down_reports_failure() {
    let home = tempfile::tempdir().unwrap();
    let url = format!("http://127.0.0.1:{}", free_port());

    book_chat(&home)
        .args(["--base-url", &url, "hello"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("hello"))
        .stderr(predicate::str::contains("Failed to send message"));
}

#[test]
fn server_error_status_reports_failure() {
    let url = spawn_backend(
        StatusCode::SERVICE_UNAVAILABLE,
        serde_json::json!({ "detail": "not ready" }),
    );
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .args(["--base-url", &url, "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to send message"))
        .stderr(predicate::str::is_match("(?i)(503|status)").unwrap());
}

#[test]
fn blank_question_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .args(["--base-url", "http://127.0.0.1:9", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question provided"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .arg("--config")
        .arg(home.path().join("absent.yaml"))
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn invalid_base_url_is_an_error() {
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .args(["--base-url", "not a url", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}

#[test]
fn failure_cause_is_printed_regardless_of_log_level() {
    let url = spawn_backend(
        StatusCode::SERVICE_UNAVAILABLE,
        serde_json::json!({ "detail": "not ready" }),
    );
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .env("RUST_LOG", "off")
        .args(["--base-url", &url, "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("! Failed to send message"))
        .stderr(predicate::str::contains("Error: query failed: server returned status 503"));
}

#[test]
fn interactive_failure_shows_only_the_notice() {
    let url = spawn_backend(
        StatusCode::SERVICE_UNAVAILABLE,
        serde_json::json!({ "detail": "not ready" }),
    );
    let home = tempfile::tempdir().unwrap();

    book_chat(&home)
        .args(["--base-url", &url])
        .write_stdin("hello\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("! Failed to send message").count(1))
        .stderr(predicate::str::contains("WARN").not())
        .stderr(predicate::str::contains("ERROR").not());
}
