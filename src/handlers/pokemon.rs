//! Pokemon CRUD handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::model::PokemonInput;
use crate::query::{ListQuery, PaginationMeta};
use crate::response::{success_message, success_one_ok, success_paginated, timestamp};
use crate::service::PokemonService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::collections::HashMap;

pub(crate) fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", raw)))
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let query = ListQuery::for_list(&params)?;
    let found = PokemonService::list(state.store.as_ref(), &query).await?;
    let pagination = PaginationMeta::new(query.page.unwrap_or_default(), found.total);
    Ok(success_paginated(
        found.items,
        pagination,
        json!({
            "filters": query.predicate.filter,
            "sort": query.sort.field.api_name(),
            "order": query.sort.order.as_sql(),
            "timestamp": timestamp(),
        }),
    ))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let pokemon = PokemonService::read(state.store.as_ref(), id).await?;
    Ok(success_one_ok(pokemon, json!({ "timestamp": timestamp() })))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<PokemonInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body?;
    let created = PokemonService::create(state.store.as_ref(), input).await?;
    Ok(success_message(StatusCode::CREATED, created, "Pokemon created successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PokemonInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let updated = PokemonService::update(state.store.as_ref(), id, input).await?;
    Ok(success_message(StatusCode::OK, updated, "Pokemon updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let deleted = PokemonService::delete(state.store.as_ref(), id).await?;
    Ok(success_message(StatusCode::OK, deleted, "Pokemon deleted successfully"))
}
