//! Audit logging middleware.
//!
//! Logs every authenticated API request with user_id, method, path and
//! response status. Runs innermost (after auth has injected UserContext).

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::UserContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user_id = req.extensions().get::<UserContext>().map(|u| u.user_id);

    let response = next.run(req).await;

    let status = response.status().as_u16();
    match user_id {
        Some(user_id) => tracing::info!(user_id, %method, %path, status, "API access"),
        None => tracing::info!(%method, %path, status, "API access"),
    }

    response
}
