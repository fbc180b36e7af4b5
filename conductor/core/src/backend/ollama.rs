//! Ollama Backend Implementation
//!
//! Reply backend for Ollama (local LLM server).
//!
//! # Ollama API
//!
//! Uses `/api/chat` without streaming and with `"format": "json"`, so the
//! model is constrained to emit a JSON object. `/api/tags` serves as the
//! health check.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{parse_reply, BackendError, ReplyBackend};
use crate::events::InboundTurn;

/// Instructions sent as the system message
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are the voice of a softly glowing orb that breathes while it talks. \
Answer briefly and warmly. Reply with a single JSON object and nothing else:
{\"message\": \"<your reply>\", \"sceneUpdate\": {\"action\": \"color\", \"value\": \"#RRGGBB\"}}
Pick a colour that matches the mood or topic of the conversation. \
When no colour change fits, set \"sceneUpdate\" to null.";

/// Ollama backend client
#[derive(Clone, Debug)]
pub struct OllamaBackend {
    /// Host address
    host: String,
    /// Port number
    port: u16,
    /// Model name
    model: String,
    /// System message
    system_prompt: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        model: impl Into<String>,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            host: host.into(),
            port,
            model: model.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
        })
    }

    /// Create from environment variables
    ///
    /// `OLLAMA_HOST` (default `localhost`), `OLLAMA_PORT` (default `11434`)
    /// and `ZENORB_MODEL` (default `llama3.2`).
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, BackendError> {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);
        let model = std::env::var("ZENORB_MODEL").unwrap_or_else(|_| "llama3.2".to_string());

        Self::new(host, port, model)
    }

    /// Replace the system message
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url())
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url())
    }

    fn request_body(&self, message: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system_prompt },
                { "role": "user", "content": message },
            ],
            "stream": false,
            "format": "json",
            "options": { "temperature": 0.7 },
        })
    }
}

#[async_trait]
impl ReplyBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    async fn reply(&self, message: &str) -> Result<InboundTurn, BackendError> {
        let response = self
            .http_client
            .post(self.chat_url())
            .json(&self.request_body(message))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let data: serde_json::Value = response.json().await?;
        let content = data
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| BackendError::Decode("missing message.content".into()))?;

        tracing::debug!(model = %self.model, chars = content.len(), "Reply received");
        Ok(parse_reply(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ollama_backend_creation() {
        let backend = OllamaBackend::new("localhost", 11434, "llama3.2").unwrap();
        assert_eq!(backend.host, "localhost");
        assert_eq!(backend.port, 11434);
        assert_eq!(backend.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(backend.tags_url(), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_request_body() {
        let backend = OllamaBackend::new("h", 1, "m")
            .unwrap()
            .with_system_prompt("be an orb");
        let body = backend.request_body("hello");

        assert_eq!(body["model"], "m");
        assert_eq!(body["stream"], false);
        assert_eq!(body["format"], "json");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be an orb");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_default_prompt_describes_wire_form() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("\"sceneUpdate\""));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("\"message\""));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_http_error() {
        let backend = OllamaBackend::new("127.0.0.1", 9, "m").unwrap();
        assert!(!backend.health_check().await);
        assert!(matches!(
            backend.reply("hi").await,
            Err(BackendError::Http(_))
        ));
    }
}
