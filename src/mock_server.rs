//! Mock HTTP servers for testing adapters offline
//!
//! wiremock-based stand-ins for the OpenAI-shaped (OpenAI, DeepSeek) and
//! Anthropic-shaped upstream APIs, so adapter tests run without real keys.

use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock server speaking the OpenAI chat-completions wire format
pub struct OpenAiMockServer {
    server: MockServer,
}

impl OpenAiMockServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "created": 1234567890,
            "model": "mock-model",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 10,
                "total_tokens": 20
            }
        })
    }

    /// Respond to any chat completion with `content`
    pub async fn mock_chat_completion(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(content)))
            .mount(&self.server)
            .await;
    }

    /// Respond with `content` only when the request body contains `expected`
    /// as a partial JSON match; other requests fall through to wiremock's 404
    pub async fn mock_chat_completion_expecting(&self, expected: serde_json::Value, content: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(content)))
            .mount(&self.server)
            .await;
    }

    /// Respond with an error status and body
    pub async fn mock_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({ "error": { "message": message } })),
            )
            .mount(&self.server)
            .await;
    }
}

/// Mock server speaking the Anthropic messages wire format
pub struct AnthropicMockServer {
    server: MockServer,
}

impl AnthropicMockServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    fn message_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "msg-mock",
            "type": "message",
            "role": "assistant",
            "content": [{
                "type": "text",
                "text": content
            }],
            "stop_reason": "end_turn",
            "model": "mock-model",
            "usage": {
                "input_tokens": 10,
                "output_tokens": 10
            }
        })
    }

    /// Respond to any message request with `content`
    pub async fn mock_message(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::message_body(content)))
            .mount(&self.server)
            .await;
    }

    /// Respond with `content` only when the request body contains `expected`
    /// as a partial JSON match
    pub async fn mock_message_expecting(&self, expected: serde_json::Value, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::message_body(content)))
            .mount(&self.server)
            .await;
    }

    /// Respond with a well-formed message carrying no content blocks
    pub async fn mock_empty_content(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg-mock",
                "type": "message",
                "role": "assistant",
                "content": [],
                "stop_reason": "end_turn",
                "model": "mock-model",
                "usage": {
                    "input_tokens": 10,
                    "output_tokens": 0
                }
            })))
            .mount(&self.server)
            .await;
    }
}
