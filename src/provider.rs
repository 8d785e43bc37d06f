//! LLM provider abstraction: one `generate` capability, two wire shapes.
//!
//! The two backends differ only in request/response layout and
//! authentication:
//!
//! * **OpenAI** sends the prompt as a system+user message pair to
//!   `/v1/chat/completions` with a bearer token, and reads
//!   `choices[0].message.content`.
//! * **Anthropic** sends a single user message to `/v1/messages` with an
//!   `x-api-key` header, and reads `content[0].text`.
//!
//! Everything else (model id, `max_tokens`, `temperature`) comes from the
//! shared [`WinnowerConfig`]. The variant is selected once at construction
//! via [`create_provider`]; callers only ever see `Arc<dyn LlmProvider>`.
//!
//! Missing API keys are deliberately not a construction error: they surface
//! at call time, where the extractor turns them into embedded error text so
//! one unconfigured provider cannot abort a batch.

use crate::config::WinnowerConfig;
use crate::error::WinnowerError;
use crate::prompts::SYSTEM_PROMPT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// OpenAI chat-completions endpoint.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Anthropic messages endpoint.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Send one prompt, return the model's text.
    async fn generate(&self, prompt: &str) -> Result<String, WinnowerError>;

    /// Provider name as used on the command line.
    fn name(&self) -> &str;
}

/// Instantiate a provider by name.
///
/// `openai` and `anthropic` are the supported variants; anything else is
/// [`WinnowerError::UnsupportedProvider`].
pub fn create_provider(
    name: &str,
    config: &WinnowerConfig,
) -> Result<Arc<dyn LlmProvider>, WinnowerError> {
    match name {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config))),
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(config))),
        other => Err(WinnowerError::UnsupportedProvider {
            provider: other.to_string(),
        }),
    }
}

fn provider_err(provider: &str, message: impl Into<String>) -> WinnowerError {
    WinnowerError::Provider {
        provider: provider.to_string(),
        message: message.into(),
    }
}

// ── OpenAI ───────────────────────────────────────────────────────────────

/// OpenAI chat-completions backend.
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    content: String,
}

impl OpenAiProvider {
    /// Build a provider from the shared config, reading `OPENAI_API_KEY`
    /// from the environment.
    pub fn new(config: &WinnowerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: config.openai_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, WinnowerError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| provider_err("openai", "OPENAI_API_KEY is not set"))?;

        let request = OpenAiRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| provider_err("openai", format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(provider_err("openai", format!("HTTP {status}: {body}")));
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| provider_err("openai", format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| provider_err("openai", "response contained no choices"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ── Anthropic ────────────────────────────────────────────────────────────

/// Anthropic messages backend.
#[derive(Debug)]
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    text: String,
}

impl AnthropicProvider {
    /// Build a provider from the shared config, reading `ANTHROPIC_API_KEY`
    /// from the environment.
    pub fn new(config: &WinnowerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: config.anthropic_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(&self, prompt: &str) -> Result<String, WinnowerError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| provider_err("anthropic", "ANTHROPIC_API_KEY is not set"))?;

        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| provider_err("anthropic", format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(provider_err("anthropic", format!("HTTP {status}: {body}")));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| provider_err("anthropic", format!("malformed response: {e}")))?;

        parsed
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| provider_err("anthropic", "response contained no content blocks"))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
