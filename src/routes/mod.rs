//! Router assembly: service routes, `/api/v1`, the 404 fallback, and the tower-http stack.

mod common;
mod pokemon;

pub use common::common_routes;
pub use pokemon::pokemon_routes;

use crate::config::AppConfig;
use crate::handlers::route_not_found;
use crate::middleware::{cors, security_headers, RateLimiter};
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body. Larger JSON bodies are rejected with a 413 envelope.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The full application router.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let [nosniff, frame_options, referrer_policy, xss_protection] = security_headers();

    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", pokemon_routes(state, limiter))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(nosniff)
        .layer(frame_options)
        .layer(referrer_policy)
        .layer(xss_protection)
        .layer(CompressionLayer::new())
        .layer(cors(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
}
