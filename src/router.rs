//! Model-name classification and adapter dispatch

use crate::adapter::{AnthropicAdapter, ChatAdapter, DeepSeekAdapter, OpenAiAdapter};
use crate::credentials::CredentialResolver;
use crate::schema::{ChatRequest, ChatResponse};
use crate::{Error, Result};
use tracing::{error, info};

/// Provider family a model name classifies into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    OpenAi,
    Anthropic,
    DeepSeek,
}

impl ProviderFamily {
    /// Classify a model name by provider-family substring.
    ///
    /// Deliberately permissive: any "gpt" variant goes to OpenAI, any
    /// "claude" variant to Anthropic, any "deepseek" variant to DeepSeek.
    /// Returns `None` for names outside every family.
    pub fn classify(model: &str) -> Option<Self> {
        if model.contains("gpt") {
            Some(ProviderFamily::OpenAi)
        } else if model.contains("claude") {
            Some(ProviderFamily::Anthropic)
        } else if model.contains("deepseek") {
            Some(ProviderFamily::DeepSeek)
        } else {
            None
        }
    }

    /// Family name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ProviderFamily::OpenAi => "openai",
            ProviderFamily::Anthropic => "anthropic",
            ProviderFamily::DeepSeek => "deepseek",
        }
    }
}

/// Dispatches validated chat requests to the adapter matching the requested
/// model's provider family.
///
/// Holds one adapter per family, constructed once at startup; `route` itself
/// keeps no per-request state, so concurrent requests never interfere.
pub struct Router {
    openai: Box<dyn ChatAdapter>,
    anthropic: Box<dyn ChatAdapter>,
    deepseek: Box<dyn ChatAdapter>,
}

impl Router {
    /// Build a router from explicit adapters (tests inject stubs here)
    pub fn new(
        openai: Box<dyn ChatAdapter>,
        anthropic: Box<dyn ChatAdapter>,
        deepseek: Box<dyn ChatAdapter>,
    ) -> Self {
        Router {
            openai,
            anthropic,
            deepseek,
        }
    }

    /// Build a router over the real provider endpoints, resolving each
    /// provider's credential up front. Fails with
    /// [`Error::CredentialNotFound`] if any key is unavailable, so the
    /// process never starts serving a family it cannot reach.
    pub fn from_resolver(resolver: &CredentialResolver) -> Result<Self> {
        Ok(Router::new(
            Box::new(OpenAiAdapter::new(resolver)?),
            Box::new(AnthropicAdapter::new(resolver)?),
            Box::new(DeepSeekAdapter::new(resolver)?),
        ))
    }

    /// Validate the request, select the adapter by model family, and wrap
    /// the reply with the originally requested model identifier.
    pub async fn route(&self, request: ChatRequest) -> Result<ChatResponse> {
        if request.messages.is_empty() {
            error!("rejected chat request for model {}: empty messages", request.model);
            return Err(Error::Validation("messages list is empty".to_string()));
        }

        let family = ProviderFamily::classify(&request.model).ok_or_else(|| {
            error!("no provider family matches model {}", request.model);
            Error::UnrecognizedModel(request.model.clone())
        })?;

        info!(
            "routing chat request for model {} to {} ({} messages)",
            request.model,
            family.name(),
            request.messages.len()
        );

        let adapter = match family {
            ProviderFamily::OpenAi => &self.openai,
            ProviderFamily::Anthropic => &self.anthropic,
            ProviderFamily::DeepSeek => &self.deepseek,
        };

        let reply = adapter.complete(&request.messages).await.map_err(|e| {
            error!("completion for model {} failed: {}", request.model, e);
            e
        })?;

        Ok(ChatResponse {
            response: reply,
            model_used: request.model,
        })
    }
}
