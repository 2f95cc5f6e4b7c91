//! Chat backend implementation
//!
//! Talks to an Ollama-style `/api/chat` endpoint. One attempt per call:
//! the caller applies a timeout and falls through to canned content on any
//! failure, so retrying here would only add latency to the fallback.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use calltrainer_config::OracleConfig;
use calltrainer_core::{ChatMessage, GenerationRequest, OracleError, TextGenerator};

/// Ollama-style chat backend
#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    config: OracleConfig,
}

impl OllamaBackend {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                OracleError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.config.endpoint, path)
    }
}

#[async_trait]
impl TextGenerator for OllamaBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, OracleError> {
        let body = OllamaChatRequest {
            model: self.config.model.clone(),
            messages: request.messages.iter().map(|m| m.into()).collect(),
            stream: false,
            options: Some(OllamaOptions {
                temperature: Some(request.temperature),
                num_predict: Some(request.max_tokens as i32),
            }),
        };

        let mut req = self.client.post(self.api_url("/chat")).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else {
                OracleError::Network(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(OracleError::Api(format!("{}: {}", status, error)));
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            tokens = parsed.eval_count.unwrap_or(0),
            "oracle generation complete"
        );

        Ok(parsed.message.content)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OllamaMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.to_string(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    eval_count: Option<u64>,
}
