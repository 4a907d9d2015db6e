//! Per-client rate limiting middleware.
//!
//! Applies sliding-window rate limits per signed-in user, or per peer IP
//! when the request carries no live session token:
//! - 100 requests per minute
//! - 1000 requests per hour

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::auth::bearer_token;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Bucket for a request. Unresolved tokens never pick the bucket.
fn client_key(session_user: Option<i64>, peer: Option<SocketAddr>) -> String {
    match (session_user, peer) {
        (Some(user_id), _) => format!("user:{user_id}"),
        (None, Some(addr)) => format!("peer:{}", addr.ip()),
        (None, None) => "peer:unknown".to_string(),
    }
}

fn rate_key(req: &Request<axum::body::Body>, ctx: &ApiContext) -> Result<String, ApiError> {
    let session_user = match bearer_token(req) {
        Some(token) => ctx.core.read_sessions()?.user_for(token),
        None => None,
    };
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    Ok(client_key(session_user, peer))
}

/// Returns 429 if the client exceeded its window.
/// Accesses `ApiContext` from request extensions.
pub async fn limit(req: Request<axum::body::Body>, next: Next) -> Response {
    match limit_inner(req, next).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn limit_inner(req: Request<axum::body::Body>, next: Next) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let key = rate_key(&req, &ctx)?;

    // MutexGuard is !Send, drop before .await via block scope
    {
        let mut limiter = ctx
            .rate_limiter
            .lock()
            .map_err(|_| ApiError::Internal("rate limiter lock".into()))?;

        limiter.check(&key).map_err(|retry_after| {
            tracing::warn!(key = %key, retry_after, "Rate limit exceeded");
            ApiError::RateLimited { retry_after }
        })?;
    }

    Ok(next.run(req).await)
}
