//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! Wraps `reqwest` with bearer-key auth, typed error handling, and the
//! envelope checks the service contract requires. The pipeline treats
//! the service as an opaque prompt-in/text-out collaborator.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::TextGenError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for the text-generation service.
///
/// Use [`TextGenClient::new`] for production or
/// [`TextGenClient::with_base_url`] to point at a mock server in tests.
/// Construct per request and pass by reference; no global singletons.
pub struct TextGenClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl TextGenClient {
    /// Creates a new client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TextGenError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, TextGenError> {
        Self::with_base_url(api_key, model, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TextGenError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TextGenError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, TextGenError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| TextGenError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Sends one prompt and returns the first choice's message content.
    ///
    /// One attempt, no retries: every caller has a documented fallback
    /// for a failed generation, so retrying here would only add latency.
    ///
    /// # Errors
    ///
    /// - [`TextGenError::UnexpectedStatus`] on a non-2xx response.
    /// - [`TextGenError::ApiError`] if the envelope carries an error
    ///   message or contains no choices.
    /// - [`TextGenError::Http`] on network failure.
    /// - [`TextGenError::Deserialize`] if the body is not the expected shape.
    pub async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, TextGenError> {
        let url = self.completions_url()?;
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error envelopes carry a message worth surfacing over the
            // bare status code.
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
                if let Some(msg) = value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(serde_json::Value::as_str)
                {
                    return Err(TextGenError::ApiError(msg.to_string()));
                }
            }
            return Err(TextGenError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| TextGenError::Deserialize {
                context: format!("chat completion (model={})", self.model),
                source: e,
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TextGenError::ApiError("response contained no choices".to_string()))?;

        tracing::debug!(model = %self.model, chars = content.len(), "generation complete");
        Ok(content)
    }

    fn completions_url(&self) -> Result<Url, TextGenError> {
        self.base_url
            .join("v1/chat/completions")
            .map_err(|e| TextGenError::ApiError(format!("invalid completions URL: {e}")))
    }
}
