//! HTTP client for the OpenAI Responses API.

use std::time::Duration;

use coldmail_core::config::{
    DEFAULT_GENERATION_BACKOFF_BASE_MS, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_OPENAI_MODEL, DEFAULT_REASONING_EFFORT,
};
use coldmail_core::GenerationResult;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::GenerationError;
use crate::length::{enforce_word_ceiling, strip_greeting, word_count, MAX_WORDS};
use crate::prompt::GenerationRequest;
use crate::repair::extract_email;
use crate::retry::retry_with_backoff;

/// Client for the text generation service.
///
/// Retries are off unless [`OpenAiClient::with_retries`] is called.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
    max_output_tokens: u32,
    reasoning_effort: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ResponsesEnvelope {
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl ResponsesEnvelope {
    /// Concatenated `output_text` parts, falling back to the top-level
    /// `output_text` convenience field.
    fn text(self) -> String {
        let parts: Vec<String> = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect();
        if parts.is_empty() {
            self.output_text.unwrap_or_default()
        } else {
            parts.concat()
        }
    }
}

impl OpenAiClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GenerationError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_OPENAI_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GenerationError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("coldmail/0.1 (generation)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GenerationError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            reasoning_effort: Some(DEFAULT_REASONING_EFFORT.to_string()),
            max_retries: 0,
            backoff_base_ms: DEFAULT_GENERATION_BACKOFF_BASE_MS,
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Sets the reasoning effort hint. `None` omits the `reasoning` block,
    /// for models that do not accept it.
    #[must_use]
    pub fn with_reasoning_effort(mut self, effort: Option<&str>) -> Self {
        self.reasoning_effort = effort.map(str::to_string);
        self
    }

    /// Enables retries on 429/5xx and transport failures.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `request` and returns a cleaned message of at most
    /// [`MAX_WORDS`] words.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Http`] / [`GenerationError::Service`] when the
    ///   call fails or the service answers with an error status.
    /// - [`GenerationError::Format`] when the reply holds no usable
    ///   `{"email": ...}` object.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        tracing::info!(
            strategy = ?request.strategy(),
            model = %self.model,
            "requesting generated email"
        );
        let raw = self.complete(&request.prompt()).await?;
        let extracted = extract_email(&raw)?;

        let body = strip_greeting(&extracted.email);
        let words = word_count(&body);
        let email = if words > MAX_WORDS {
            tracing::warn!(words, max = MAX_WORDS, "generated email over budget, truncating");
            enforce_word_ceiling(&body, MAX_WORDS)
        } else {
            body
        };

        Ok(GenerationResult { email })
    }

    /// Sends a single prompt and returns the raw reply text.
    ///
    /// # Errors
    ///
    /// See [`OpenAiClient::generate`]; no format checking happens here.
    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = self
            .base_url
            .join("responses")
            .map_err(|e| GenerationError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        let body = self.request_body(prompt);
        let body = &body;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || {
            self.send(url.clone(), body)
        })
        .await
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model,
            "input": prompt,
            "max_output_tokens": self.max_output_tokens,
            "text": { "format": { "type": "json_object" } },
        });
        if let Some(effort) = &self.reasoning_effort {
            body["reasoning"] = json!({ "effort": effort });
        }
        body
    }

    async fn send(&self, url: Url, body: &Value) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message: error_message(&text)
                    .unwrap_or_else(|| format!("HTTP {status} with no error message")),
            });
        }

        let envelope: ResponsesEnvelope =
            serde_json::from_str(&text).map_err(|e| GenerationError::Deserialize {
                context: "responses envelope".to_string(),
                source: e,
            })?;

        if let Some(usage) = &envelope.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "generation usage"
            );
        }

        Ok(envelope.text())
    }
}

/// `error.message` from an API error body, if present.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
