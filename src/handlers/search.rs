//! Free-text search across name, species and description.

use crate::error::AppError;
use crate::query::{ListQuery, PaginationMeta};
use crate::response::{success_many, success_paginated, timestamp};
use crate::service::PokemonService;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use std::collections::HashMap;

pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let query = ListQuery::for_search(&params)?;
    let found = PokemonService::list(state.store.as_ref(), &query).await?;
    tracing::debug!(q = ?query.predicate.text, total = found.total, "search");
    let meta = json!({
        "query": query.predicate.text,
        "count": found.items.len(),
        "totalItems": found.total,
        "filters": query.predicate.filter,
        "timestamp": timestamp(),
    });
    Ok(match query.page {
        Some(page) => success_paginated(found.items, PaginationMeta::new(page, found.total), meta),
        None => success_many(found.items, meta),
    })
}
