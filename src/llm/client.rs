//! Ollama chat client used for both vision and text prompts.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::config::LlmConfig;

/// Errors that can occur talking to the model endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to the model service
    #[error("Connection error: {0}")]
    Connection(String),
    /// The call exceeded its bounded wait
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// API returned a non-success status
    #[error("API error: {0}")]
    Api(String),
    /// Response body was not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A single-turn prompt, optionally carrying an image.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub prompt: String,
    /// Base64-encoded PNG, present only for vision calls.
    pub image_png_base64: Option<String>,
    /// Context window override.
    pub num_ctx: Option<u32>,
}

impl ChatRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn vision(prompt: impl Into<String>, image_png_base64: String) -> Self {
        Self {
            prompt: prompt.into(),
            image_png_base64: Some(image_png_base64),
            num_ctx: None,
        }
    }

    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = Some(num_ctx);
        self
    }
}

/// Something that answers chat prompts.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Name used in user-facing error messages.
    fn display_name(&self) -> &str;

    /// Send one prompt and return the trimmed reply text.
    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

/// Ollama `/api/chat` request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<OllamaMessage<'a>>,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<&'a str>>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
}

/// Ollama `/api/chat` response format.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaReply>,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}

/// Chat client for an Ollama server.
pub struct OllamaClient {
    config: LlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Check if the model service is reachable.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.endpoint);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let body = OllamaChatRequest {
            model: &self.config.model,
            stream: false,
            messages: vec![OllamaMessage {
                role: "user",
                content: &request.prompt,
                images: request.image_png_base64.as_deref().map(|img| vec![img]),
            }],
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_ctx: request.num_ctx,
            },
        };

        let url = format!("{}/api/chat", self.config.endpoint);
        debug!(
            "POST {} (model={}, image={}, prompt_chars={})",
            url,
            self.config.model,
            request.image_png_base64.is_some(),
            request.prompt.len()
        );

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let parsed: OllamaChatResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.config.timeout_secs)
            } else {
                LlmError::Parse(e.to_string())
            }
        })?;

        Ok(parsed
            .message
            .map(|m| m.content.trim().to_string())
            .unwrap_or_default())
    }
}
