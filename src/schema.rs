//! Shared request/response contract between callers and adapters

use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (sets behavior)
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Message::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Message::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::new(Role::Assistant, content)
    }
}

/// Inbound chat request
///
/// `model` is kept as a free-form string so provider model-name variants
/// (e.g. "gpt-4o-mini") still classify by family. Unknown names are rejected
/// by the router, not at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered conversation; turn order is significant
    pub messages: Vec<Message>,

    /// Requested model identifier
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    crate::adapter::DEEPSEEK_DEFAULT_MODEL.to_string()
}

/// Outbound chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text from the provider
    pub response: String,

    /// Model identifier the caller asked for
    pub model_used: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
    }

    #[test]
    fn test_request_model_defaults_to_deepseek() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hello"}]}"#).unwrap();
        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_request_rejects_unknown_role() {
        let result: std::result::Result<ChatRequest, _> =
            serde_json::from_str(r#"{"messages":[{"role":"tool","content":"x"}],"model":"gpt-4o"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_response_shape() {
        let response = ChatResponse {
            response: "hi there".to_string(),
            model_used: "deepseek-chat".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response"], "hi there");
        assert_eq!(json["model_used"], "deepseek-chat");
    }
}
