//! LLM Backend Module
//!
//! Provides a unified interface for text-generation backends. The advisory
//! orchestrator only sees the [`LlmBackend`] trait; which model answers — and
//! whether one is configured at all — is the composition root's business.
//!
//! The HTTP backend speaks the OpenAI-compatible chat-completions protocol,
//! which most hosted and self-hosted inference services expose.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Timeout for a single generation call. Any tighter budget belongs to the
/// backend, not the orchestrator.
const REQUEST_TIMEOUT_SECS: u64 = 45;

/// Unified trait for text-generation backends
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a response from the model given a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// OpenAI-compatible chat-completions backend.
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompatBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build advisory HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
        })
    }

    /// Pull the first choice's message text out of a chat-completions reply.
    fn extract_message_text(json: &Value) -> Option<&str> {
        json.get("choices")?
            .as_array()?
            .first()?
            .get("message")?
            .get("content")?
            .as_str()
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("advisory model request failed")?;
        if !response.status().is_success() {
            bail!(
                "advisory model call failed with status {}",
                response.status()
            );
        }

        let json: Value = response
            .json()
            .await
            .context("advisory model reply was not JSON")?;
        let text = Self::extract_message_text(&json)
            .context("advisory model reply missing message content")?;
        Ok(text.to_string())
    }

    fn backend_name(&self) -> &'static str {
        "openai-compat"
    }
}

/// Stand-in used when no advisory credentials are configured.
///
/// Always errors; the orchestrator absorbs the error into the fixed
/// unavailable text, so an unconfigured deployment still serves complete
/// snapshots.
pub struct DisabledBackend;

#[async_trait]
impl LlmBackend for DisabledBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        bail!("no advisory backend configured")
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}
