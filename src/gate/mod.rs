//! HTTP gateway module
//!
//! Transport layer over the router: axum server, request handlers, and the
//! gateway's own configuration.

pub mod config;
pub mod handlers;
pub mod server;

pub use config::GatewayConfig;
