//! Service-level handlers: API metadata, health, and the not-found fallback.

use crate::error::AppError;
use crate::response::timestamp;
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
#[serde(untagged)]
pub enum HealthBody {
    Healthy {
        status: &'static str,
        /// Seconds since startup.
        uptime: f64,
        timestamp: String,
    },
    Unhealthy {
        status: &'static str,
        error: String,
        timestamp: String,
    },
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "endpoints": {
            "health": "GET /health",
            "list": "GET /api/v1/pokemon",
            "get": "GET /api/v1/pokemon/:id",
            "create": "POST /api/v1/pokemon",
            "update": "PUT /api/v1/pokemon/:id",
            "delete": "DELETE /api/v1/pokemon/:id",
            "types": "GET /api/v1/types",
            "search": "GET /api/v1/search?q=",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthBody::Healthy {
                status: "healthy",
                uptime: state.started_at.elapsed().as_secs_f64(),
                timestamp: timestamp(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthBody::Unhealthy {
                    status: "unhealthy",
                    error: e.to_string(),
                    timestamp: timestamp(),
                }),
            )
        }
    }
}

/// Fallback for unknown paths and unsupported methods on known ones.
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
