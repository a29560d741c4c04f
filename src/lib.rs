//! Re-exports from all modules
mod adapter;
mod credentials;
mod router;
mod schema;

pub mod gate;

#[cfg(test)]
mod mock_server;

use thiserror::Error;

/// Result type for chatgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for chatgate operations
#[derive(Debug, Error)]
pub enum Error {
    /// Request failed validation before reaching any provider
    #[error("invalid request: {0}")]
    Validation(String),

    /// Model name matched no known provider family
    #[error("no provider recognizes model '{0}'")]
    UnrecognizedModel(String),

    /// Credential missing from every configured source
    #[error("credential '{0}' not found in any source")]
    CredentialNotFound(String),

    /// Upstream provider error (transport, auth, or malformed response)
    #[error("{provider} error: {detail}")]
    Provider {
        provider: &'static str,
        detail: String,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

pub use adapter::{
    AnthropicAdapter, ChatAdapter, DeepSeekAdapter, OpenAiAdapter, ANTHROPIC_DEFAULT_MODEL,
    DEEPSEEK_DEFAULT_MODEL, OPENAI_DEFAULT_MODEL,
};
pub use credentials::{
    ConfigFileSource, CredentialResolver, CredentialSource, EnvSource, ANTHROPIC_KEY_NAME,
    DEEPSEEK_KEY_NAME, OPENAI_KEY_NAME,
};
pub use router::{ProviderFamily, Router};
pub use schema::{ChatRequest, ChatResponse, Message, Role};
