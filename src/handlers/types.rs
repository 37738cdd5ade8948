//! Type chart listing.

use crate::error::AppError;
use crate::response::{success_many, timestamp};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use serde_json::json;

/// Every type with its weaknesses, strengths and immunities, ordered by name.
pub async fn list_types(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let types = state.store.list_types().await?;
    let count = types.len();
    Ok(success_many(types, json!({ "count": count, "timestamp": timestamp() })))
}
