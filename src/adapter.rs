//! Provider adapters
//!
//! Each adapter wraps one provider's native completion contract behind a
//! uniform "send conversation, get reply text" interface. Construction
//! resolves the provider credential through the [`CredentialResolver`] and
//! fails fast when it is missing; after that an adapter holds no per-request
//! state beyond its reusable HTTP client.

use crate::credentials::{
    CredentialResolver, ANTHROPIC_KEY_NAME, DEEPSEEK_KEY_NAME, OPENAI_KEY_NAME,
};
use crate::schema::{Message, Role};
use crate::{Error, Result};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

/// Default model sent to OpenAI
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

/// Default model sent to Anthropic
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default model sent to DeepSeek
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

/// Output token cap Anthropic requires on every request
const ANTHROPIC_MAX_TOKENS: u32 = 4096;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com";

/// Request timeout for upstream calls
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

/// Build an HTTP client with the upstream timeout
fn build_http_client() -> std::result::Result<HttpClient, reqwest::Error> {
    HttpClient::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Trait for provider adapters
#[async_trait::async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Send the conversation upstream and return the assistant's reply text
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Provider name for logs and error context
    fn provider(&self) -> &'static str;
}

/// Wrap any upstream failure with the provider name, after logging it
fn upstream_error(provider: &'static str, detail: impl Into<String>) -> Error {
    let detail = detail.into();
    error!("{} upstream call failed: {}", provider, detail);
    Error::Provider { provider, detail }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible wire types (also used by DeepSeek)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Issue one OpenAI-shaped completion call and extract the first choice.
///
/// Shared by the OpenAI and DeepSeek adapters, which speak the same wire
/// format against different base URLs.
async fn openai_style_complete(
    provider: &'static str,
    http_client: &HttpClient,
    api_base: &str,
    api_key: &str,
    model: &str,
    messages: &[Message],
) -> Result<String> {
    let url = format!("{}/chat/completions", api_base.trim_end_matches('/'));

    let request = CompletionRequest {
        model: model.to_string(),
        messages: messages.to_vec(),
        stream: false,
    };

    let response = http_client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&request)
        .send()
        .await
        .map_err(|e| upstream_error(provider, e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| upstream_error(provider, e.to_string()))?;

    if !status.is_success() {
        return Err(upstream_error(
            provider,
            format!("API error ({}): {}", status, body),
        ));
    }

    let response: CompletionResponse = serde_json::from_str(&body)
        .map_err(|e| upstream_error(provider, format!("failed to parse response: {}. Body: {}", e, body)))?;

    let choice = response
        .choices
        .first()
        .ok_or_else(|| upstream_error(provider, "no choices in response"))?;

    Ok(choice.message.content.clone())
}

/// OpenAI adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    api_base: String,
    api_key: String,
    http_client: HttpClient,
}

impl OpenAiAdapter {
    /// Create an adapter against the public OpenAI endpoint
    pub fn new(resolver: &CredentialResolver) -> Result<Self> {
        Self::with_base_url(resolver, OPENAI_API_BASE)
    }

    /// Create an adapter against a custom base URL
    pub fn with_base_url(resolver: &CredentialResolver, api_base: impl Into<String>) -> Result<Self> {
        let api_key = resolver.resolve(OPENAI_KEY_NAME)?;
        Ok(OpenAiAdapter {
            api_base: api_base.into(),
            api_key,
            http_client: build_http_client()?,
        })
    }
}

#[async_trait::async_trait]
impl ChatAdapter for OpenAiAdapter {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        openai_style_complete(
            self.provider(),
            &self.http_client,
            &self.api_base,
            &self.api_key,
            OPENAI_DEFAULT_MODEL,
            messages,
        )
        .await
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}

/// DeepSeek adapter (OpenAI-compatible wire format, different endpoint)
pub struct DeepSeekAdapter {
    api_base: String,
    api_key: String,
    http_client: HttpClient,
}

impl DeepSeekAdapter {
    /// Create an adapter against the public DeepSeek endpoint
    pub fn new(resolver: &CredentialResolver) -> Result<Self> {
        Self::with_base_url(resolver, DEEPSEEK_API_BASE)
    }

    /// Create an adapter against a custom base URL
    pub fn with_base_url(resolver: &CredentialResolver, api_base: impl Into<String>) -> Result<Self> {
        let api_key = resolver.resolve(DEEPSEEK_KEY_NAME)?;
        Ok(DeepSeekAdapter {
            api_base: api_base.into(),
            api_key,
            http_client: build_http_client()?,
        })
    }
}

#[async_trait::async_trait]
impl ChatAdapter for DeepSeekAdapter {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        openai_style_complete(
            self.provider(),
            &self.http_client,
            &self.api_base,
            &self.api_key,
            DEEPSEEK_DEFAULT_MODEL,
            messages,
        )
        .await
    }

    fn provider(&self) -> &'static str {
        "deepseek"
    }
}

// ---------------------------------------------------------------------------
// Anthropic wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

/// Anthropic adapter
pub struct AnthropicAdapter {
    api_base: String,
    api_key: String,
    http_client: HttpClient,
}

impl AnthropicAdapter {
    /// Create an adapter against the public Anthropic endpoint
    pub fn new(resolver: &CredentialResolver) -> Result<Self> {
        Self::with_base_url(resolver, ANTHROPIC_API_BASE)
    }

    /// Create an adapter against a custom base URL
    pub fn with_base_url(resolver: &CredentialResolver, api_base: impl Into<String>) -> Result<Self> {
        let api_key = resolver.resolve(ANTHROPIC_KEY_NAME)?;
        Ok(AnthropicAdapter {
            api_base: api_base.into(),
            api_key,
            http_client: build_http_client()?,
        })
    }
}

#[async_trait::async_trait]
impl ChatAdapter for AnthropicAdapter {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let provider = self.provider();
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));

        // Anthropic takes system prompts as a separate field, not as a
        // message role. Hoist the first system message; the rest of the
        // conversation passes through unmodified.
        let (system, others): (Vec<_>, Vec<_>) =
            messages.iter().partition(|m| m.role == Role::System);

        let system_content = system.first().map(|m| m.content.clone());
        let messages: Vec<_> = others.into_iter().cloned().collect();

        let request = MessagesRequest {
            model: ANTHROPIC_DEFAULT_MODEL.to_string(),
            messages,
            system: system_content,
            max_tokens: ANTHROPIC_MAX_TOKENS,
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| upstream_error(provider, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| upstream_error(provider, e.to_string()))?;

        if !status.is_success() {
            return Err(upstream_error(
                provider,
                format!("API error ({}): {}", status, body),
            ));
        }

        let response: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            upstream_error(provider, format!("failed to parse response: {}. Body: {}", e, body))
        })?;

        response
            .content
            .first()
            .map(|block| block.text.clone())
            .ok_or_else(|| upstream_error(provider, "response contained no content blocks"))
    }

    fn provider(&self) -> &'static str {
        "anthropic"
    }
}
