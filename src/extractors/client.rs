//! Identify the calling client for per-client rate limiting.

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::net::SocketAddr;

pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Client key: the peer address when the server was started with connect info,
/// else the first `X-Forwarded-For` hop, else `"unknown"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientAddr(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(ClientAddr(addr.ip().to_string()));
        }
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(ClientAddr(forwarded.unwrap_or_else(|| "unknown".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> ClientAddr {
        let (mut parts, _) = req.into_parts();
        match ClientAddr::from_request_parts(&mut parts, &()).await {
            Ok(addr) => addr,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn prefers_peer_address() {
        let mut req = Request::builder()
            .header(FORWARDED_FOR_HEADER, "10.0.0.9")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(extract(req).await, ClientAddr("127.0.0.1".into()));
    }

    #[tokio::test]
    async fn falls_back_to_first_forwarded_hop() {
        let req = Request::builder()
            .header(FORWARDED_FOR_HEADER, " 203.0.113.7 , 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await, ClientAddr("203.0.113.7".into()));
    }

    #[tokio::test]
    async fn unknown_without_any_source() {
        let req = Request::builder().body(()).unwrap();
        assert_eq!(extract(req).await, ClientAddr("unknown".into()));
    }
}
