//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Message returned to clients for 500s unless verbose errors are enabled.
pub const GENERIC_INTERNAL_MESSAGE: &str = "An unexpected error occurred";

static VERBOSE_ERRORS: AtomicBool = AtomicBool::new(false);

/// Expose internal error detail in 500 responses. Set once at startup from `APP_ENV`.
pub fn set_verbose_errors(verbose: bool) {
    VERBOSE_ERRORS.store(verbose, Ordering::Relaxed);
}

pub fn verbose_errors() -> bool {
    VERBOSE_ERRORS.load(Ordering::Relaxed)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("Route {method} {path} not found")]
    RouteNotFound { method: String, path: String },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
    #[error("Too many requests, retry in {retry_after_secs} seconds")]
    TooManyRequests { retry_after_secs: u64 },
}

impl AppError {
    pub fn pokemon_not_found(id: i32) -> Self {
        AppError::NotFound(format!("Pokemon with id {} not found", id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Category string carried in the `error` field of the envelope.
    pub fn category(&self) -> &'static str {
        match self.status() {
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::TOO_MANY_REQUESTS => "Too Many Requests",
            StatusCode::PAYLOAD_TOO_LARGE => "Payload Too Large",
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
            _ => match self {
                AppError::Validation(_) => "Validation Error",
                _ => "Bad Request",
            },
        }
    }
}

/// Client-facing message for a 500: the detail in verbose mode, a generic line otherwise.
pub fn internal_message(detail: String, verbose: bool) -> String {
    if verbose {
        detail
    } else {
        GENERIC_INTERNAL_MESSAGE.to_string()
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::PayloadTooLarge(other.body_text())
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            internal_message(self.to_string(), verbose_errors())
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            success: false,
            error: self.category(),
            message,
        };
        let mut response = (status, Json(body)).into_response();
        if let AppError::TooManyRequests { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
