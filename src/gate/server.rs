//! Gateway HTTP server

use crate::gate::config::GatewayConfig;
use crate::gate::handlers::{self, GatewayState};
use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Build the axum application over the gateway state.
///
/// Separated from [`start_server`] so tests can drive it without a listener.
pub fn app(state: GatewayState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat_handler))
        .route("/", get(handlers::root))
        .route("/health", get(handlers::root))
        .with_state(state)
        // Allow all origins, matching the development CORS policy
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging_middleware))
}

/// Start the gateway server
pub async fn start_server(config: GatewayConfig, state: GatewayState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address {}:{}: {}", config.host, config.port, e))?;

    info!("Starting gateway on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Logging middleware
async fn logging_middleware(req: Request, next: Next) -> axum::response::Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    info!("{} {} {} {:?}", method, uri, status, duration);

    response
}
