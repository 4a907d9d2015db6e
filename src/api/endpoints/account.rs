//! Account endpoints.
//!
//! `POST /api/account/register` (public): create a user and sign in
//! `POST /api/account/login` (public): exchange credentials for a token
//! `POST /api/account/logout`: revoke the presented token
//! `GET /api/account/me`: the signed-in account

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::auth::{self, IssuedSession, LoginRequest, RegisterRequest};
use crate::models::User;

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub session: IssuedSession,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub user: User,
}

/// `POST /api/account/register`: new accounts get the `user` role.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let user = with_db(&ctx, move |conn| Ok(auth::register(conn, &request)?)).await?;
    let session = ctx.core.write_sessions()?.issue(&user, false);

    Ok((StatusCode::CREATED, Json(SessionResponse { user, session })))
}

/// `POST /api/account/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let remember_me = request.remember_me;
    let user = with_db(&ctx, move |conn| {
        Ok(auth::authenticate(conn, &request.email, &request.password)?)
    })
    .await?;
    let session = ctx.core.write_sessions()?.issue(&user, remember_me);

    Ok(Json(SessionResponse { user, session }))
}

/// `POST /api/account/logout`
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<StatusCode, ApiError> {
    ctx.core.write_sessions()?.revoke(&user.token);
    tracing::info!(user_id = user.user_id, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/account/me`
pub async fn me(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<AccountResponse>, ApiError> {
    let user_id = user.user_id;
    let user = with_db(&ctx, move |conn| Ok(auth::get_account(conn, user_id)?)).await?;
    Ok(Json(AccountResponse { user }))
}
