//! Fixed-window request limiting per client.

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::extractors::ClientAddr;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Windows are swept once the table grows past this many clients.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Client key -> (requests in window, window start).
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, (u32, Instant)>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        RateLimiter {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.config.max_requests
    }

    pub fn check(&self, client: &str) -> Result<Decision, AppError> {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> Result<Decision, AppError> {
        let window = self.config.window;
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| AppError::Internal("rate limiter lock poisoned".into()))?;

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, (_, start)| now.duration_since(*start) < window);
        }

        let entry = windows.entry(client.to_string()).or_insert((0, now));
        if now.duration_since(entry.1) >= window {
            *entry = (0, now);
        }
        if entry.0 >= self.config.max_requests {
            let retry_after = window.saturating_sub(now.duration_since(entry.1));
            return Ok(Decision::Limited { retry_after });
        }
        entry.0 += 1;
        Ok(Decision::Allowed {
            remaining: self.config.max_requests - entry.0,
        })
    }
}

/// Middleware for `from_fn_with_state`: counts the request against the caller's window.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    ClientAddr(client): ClientAddr,
    request: Request,
    next: Next,
) -> Response {
    let remaining = match limiter.check(&client) {
        Ok(Decision::Allowed { remaining }) => remaining,
        Ok(Decision::Limited { retry_after }) => {
            tracing::warn!(client = %client, "rate limit exceeded");
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = AppError::TooManyRequests { retry_after_secs: secs }.into_response();
            set_limit_headers(&mut response, limiter.max_requests(), 0);
            return response;
        }
        Err(e) => return e.into_response(),
    };
    let mut response = next.run(request).await;
    set_limit_headers(&mut response, limiter.max_requests(), remaining);
    response
}

fn set_limit_headers(response: &mut Response, limit: u32, remaining: u32) {
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
}
