//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
}

/// `GET /api/health`: liveness plus a database round trip.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    with_db(&ctx, |conn| Ok(conn.query_row("SELECT 1", [], |_| Ok(()))?)).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        app: crate::config::APP_NAME,
        version: crate::config::APP_VERSION,
    }))
}
