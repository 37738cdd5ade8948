//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::query::PaginationMeta;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub success: bool,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    pub meta: serde_json::Value,
}

pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// 200 with `{success, data, meta}`.
pub fn success_one_ok<T: Serialize>(data: T, meta: serde_json::Value) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::OK,
        Json(SuccessOne {
            success: true,
            data,
            message: None,
            meta: Some(meta),
        }),
    )
}

/// `{success, data, message}` with the given status (201 for creates, 200 for updates and deletes).
pub fn success_message<T: Serialize>(
    status: StatusCode,
    data: T,
    message: impl Into<String>,
) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        status,
        Json(SuccessOne {
            success: true,
            data,
            message: Some(message.into()),
            meta: None,
        }),
    )
}

pub fn success_many<T: Serialize>(data: Vec<T>, meta: serde_json::Value) -> (StatusCode, Json<SuccessMany<T>>) {
    (
        StatusCode::OK,
        Json(SuccessMany {
            success: true,
            data,
            pagination: None,
            meta,
        }),
    )
}

pub fn success_paginated<T: Serialize>(
    data: Vec<T>,
    pagination: PaginationMeta,
    meta: serde_json::Value,
) -> (StatusCode, Json<SuccessMany<T>>) {
    (
        StatusCode::OK,
        Json(SuccessMany {
            success: true,
            data,
            pagination: Some(pagination),
            meta,
        }),
    )
}
