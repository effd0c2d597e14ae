//! HTTP surface of the gateway

mod errors;
pub mod handlers;
pub mod responses;

pub use errors::{GatewayError, X_ERROR};
pub use handlers::AppState;

use axum::routing::any;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the gateway router. Every path outside the two fixed ones goes
/// through the access decision.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/favicon.ico", any(handlers::favicon))
        .route("/robots.txt", any(handlers::robots_txt))
        .fallback(handlers::dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
