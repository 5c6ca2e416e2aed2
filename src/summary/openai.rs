//! Minimal OpenAI chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub type Result<T> = std::result::Result<T, OpenAiError>;

/// Language-model client errors
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response or no completion returned
    #[error("API error: {0}")]
    Api(String),

    /// Unexpected response body
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Chat message
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A model that turns a system instruction plus a user prompt into text
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI-compatible chat completion client
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point at a proxy or compatible server
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send messages and return the first choice's content
    pub async fn chat_completion(&self, messages: &[Message]) -> Result<String> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(OpenAiError::Api(format!("{}: {}", status, error_text)));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAiError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OpenAiError::Api("No completion returned".into()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(content)
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.chat_completion(&[Message::system(system), Message::user(user)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::test_server::{serve_once, unreachable_url};

    #[tokio::test]
    async fn returns_first_choice_content() {
        let (base, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"choices":[{"message":{"role":"assistant","content":"  Helps people. "}}]}"#,
        )
        .await;
        let client = OpenAiClient::new("sk-test").with_base_url(base).with_model("test-model");

        let content = client.complete("be brief", "hello").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(content, "  Helps people. ");
        assert!(request.starts_with("POST /chat/completions"));
        assert!(request.contains("Bearer sk-test"));
        assert!(request.contains(r#""model":"test-model""#));
        assert!(request.contains(r#""role":"system","content":"be brief""#));
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let (base, _server) =
            serve_once("401 Unauthorized", "application/json", r#"{"error":{"message":"bad key"}}"#).await;
        let client = OpenAiClient::new("sk-bad").with_base_url(base);

        let err = client.complete("s", "u").await.unwrap_err();

        assert!(matches!(err, OpenAiError::Api(ref msg) if msg.contains("bad key")));
    }

    #[tokio::test]
    async fn empty_choices_is_api_error() {
        let (base, _server) = serve_once("200 OK", "application/json", r#"{"choices":[]}"#).await;
        let client = OpenAiClient::new("sk-test").with_base_url(base);

        let err = client.complete("s", "u").await.unwrap_err();

        assert!(matches!(err, OpenAiError::Api(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let client = OpenAiClient::new("sk-test").with_base_url(unreachable_url().await);

        let err = client.complete("s", "u").await.unwrap_err();

        assert!(matches!(err, OpenAiError::Network(_)));
    }
}
