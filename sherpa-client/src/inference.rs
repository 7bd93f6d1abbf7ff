//! Inference client
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. Callers only
//! ever see an [`Analysis`]: failures are folded into `success = false`
//! so a slow or flaky model never raises into the worker.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sherpa_core::domain::analysis::Analysis;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Hugging Face router, which fronts several inference providers
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/v1";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

/// HTTP client for the chat-completions API
#[derive(Debug, Clone)]
pub struct InferenceClient {
    base_url: String,
    token: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl InferenceClient {
    /// Create a new inference client
    ///
    /// # Arguments
    /// * `base_url` - API root, without the `/chat/completions` suffix
    /// * `token` - Bearer token for the provider
    /// * `model` - Model identifier sent with every request
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::with_client(base_url, token, model, Client::new())
    }

    /// Create an inference client with a custom HTTP client
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        model: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            model: model.into(),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one prompt through the model
    pub async fn analyze(&self, prompt: &str) -> Analysis {
        match self.complete(prompt).await {
            Ok(text) if !text.trim().is_empty() => Analysis::succeeded(text.trim()),
            Ok(_) => {
                warn!("Model {} returned an empty completion", self.model);
                Analysis::failed("model returned an empty completion")
            }
            Err(e) => {
                warn!("Analysis request failed: {}", e);
                Analysis::failed(e.to_string())
            }
        }
    }

    /// Send a single-message chat completion and return the reply text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.trim(),
            }],
        };

        debug!("Requesting completion from {} ({} chars)", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse completion: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::ParseError("completion had no choices".to_string()))
    }
}
