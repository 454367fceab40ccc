//! HTTP client: one `POST {base_url}/chat` per query, normalized into a [`ChatReply`].
//!
//! No retry, backoff or timeout is applied. Every failure is handed back to the
//! caller, which decides how to present it.

use std::future::Future;

use reqwest::Url;

use crate::messages::{ChatReply, ChatRequest, ChatResponse};

/// Client error. Covers construction and every way a single exchange can fail.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base URL `{0}`")]
    InvalidBaseUrl(String),
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned status {status}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Anything that can answer a chat query. The chat view only talks to this.
pub trait ChatTransport {
    fn send_message(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ChatReply, ClientError>> + Send;
}

/// Client bound to one chat service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8000`).
    ///
    /// The URL may carry a path prefix but no query string or fragment, since
    /// `/chat` is appended to it verbatim.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        match Url::parse(base_url) {
            Ok(url)
                if matches!(url.scheme(), "http" | "https")
                    && url.has_host()
                    && url.query().is_none()
                    && url.fragment().is_none() => {}
            _ => return Err(ClientError::InvalidBaseUrl(base_url.to_string())),
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `query` and wait for the answer.
    pub async fn send_message(&self, query: &str) -> Result<ChatReply, ClientError> {
        let url = format!("{}/chat", self.base_url);
        let response = match self.http.post(&url).json(&ChatRequest::new(query)).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(%url, error = %e, "chat request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), %body, "chat request rejected");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!(%url, status = status.as_u16(), %body, "chat response");

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(%url, error = %e, "chat response body malformed");
            ClientError::Decode(e.to_string())
        })?;
        Ok(parsed.into())
    }
}

impl ChatTransport for ChatClient {
    fn send_message(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ChatReply, ClientError>> + Send {
        ChatClient::send_message(self, query)
    }
}
