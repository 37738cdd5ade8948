//! Versioned API routes, mounted under `/api/v1`. Every route here is rate limited.

use crate::handlers::{list_types, pokemon, route_not_found, search};
use crate::middleware::{rate_limit, RateLimiter};
use crate::state::AppState;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

pub fn pokemon_routes(state: AppState, limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .route(
            "/pokemon",
            get(pokemon::list).post(pokemon::create).fallback(route_not_found),
        )
        .route(
            "/pokemon/:id",
            get(pokemon::read)
                .put(pokemon::update)
                .delete(pokemon::delete)
                .fallback(route_not_found),
        )
        .route("/search", get(search).fallback(route_not_found))
        .route("/types", get(list_types).fallback(route_not_found))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit))
        .with_state(state)
}
