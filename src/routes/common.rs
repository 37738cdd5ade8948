//! Service routes outside the versioned API: GET / and GET /health.

use crate::handlers::{health, root, route_not_found};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root).fallback(route_not_found))
        .route("/health", get(health).fallback(route_not_found))
        .with_state(state)
}
