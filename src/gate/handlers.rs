//! HTTP request handlers for the gateway

use crate::{ChatRequest, ChatResponse, Error, Router};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Gateway state shared across handlers
#[derive(Clone)]
pub struct GatewayState {
    pub router: Arc<Router>,
}

/// Error wrapper mapping crate errors onto HTTP responses.
///
/// Validation and classification failures are the caller's fault (400-class);
/// upstream provider failures map to 502; everything else is a 500. The body
/// carries the error detail under `detail`.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) | Error::UnrecognizedModel(_) => StatusCode::BAD_REQUEST,
            Error::Provider { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::CredentialNotFound(_) | Error::Json(_) | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

/// Handle a chat request: validate, route to the matching provider adapter,
/// and return the normalized response
pub async fn chat_handler(
    State(state): State<GatewayState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!("received chat request for model {}", request.model);
    let response = state.router.route(request).await?;
    Ok(Json(response))
}

/// Liveness handler
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "API is running"
    }))
}
