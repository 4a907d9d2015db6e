//! Doctor endpoints. Reads are open to any account; writes need
//! [`Permission::ManageDoctors`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::authorization::{require, Permission};
use crate::clinic::doctors;
use crate::models::{Doctor, DoctorInput};

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<Doctor>,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let doctors = with_db(&ctx, move |conn| Ok(doctors::list_doctors(conn)?)).await?;
    Ok(Json(DoctorsResponse { doctors }))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<Json<Doctor>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let doctor = with_db(&ctx, move |conn| Ok(doctors::get_doctor(conn, id)?)).await?;
    Ok(Json(doctor))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(input): Json<DoctorInput>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    require(user.role, Permission::ManageDoctors)?;
    let doctor = with_db(&ctx, move |conn| Ok(doctors::create_doctor(conn, input)?)).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
    Json(input): Json<DoctorInput>,
) -> Result<Json<Doctor>, ApiError> {
    require(user.role, Permission::ManageDoctors)?;
    let doctor = with_db(&ctx, move |conn| Ok(doctors::update_doctor(conn, id, input)?)).await?;
    Ok(Json(doctor))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require(user.role, Permission::ManageDoctors)?;
    with_db(&ctx, move |conn| Ok(doctors::delete_doctor(conn, id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
