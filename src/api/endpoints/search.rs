//! Appointment search endpoints.
//!
//! `GET /api/search/options`: dropdown data for the search form
//! `POST /api/search`: criteria in, at most 100 appointments out

use axum::extract::State;
use axum::{Extension, Json};

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::authorization::{require, Permission};
use crate::models::SearchCriteria;
use crate::options::{self, OptionLists};
use crate::search::{self, SearchResults};

/// `GET /api/search/options`: patients, active doctors, statuses.
pub async fn form_options(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<OptionLists>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let options = with_db(&ctx, move |conn| Ok(options::search_options(conn)?)).await?;
    Ok(Json(options))
}

/// `POST /api/search`
pub async fn run(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(criteria): Json<SearchCriteria>,
) -> Result<Json<SearchResults>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let results = with_db(&ctx, move |conn| Ok(search::run_search(conn, criteria)?)).await?;

    Ok(Json(results))
}
