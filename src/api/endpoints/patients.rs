//! Patient endpoints.
//!
//! - `GET /api/patients`, `POST /api/patients`
//! - `GET|PUT|DELETE /api/patients/:id`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::authorization::{require, Permission};
use crate::clinic::patients;
use crate::models::{Patient, PatientInput};

#[derive(Serialize)]
pub struct PatientsResponse {
    pub patients: Vec<Patient>,
}

/// `GET /api/patients`: alphabetical by last name.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<PatientsResponse>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let patients = with_db(&ctx, move |conn| Ok(patients::list_patients(conn)?)).await?;
    Ok(Json(PatientsResponse { patients }))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let patient = with_db(&ctx, move |conn| Ok(patients::get_patient(conn, id)?)).await?;
    Ok(Json(patient))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(input): Json<PatientInput>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    require(user.role, Permission::EditClinicData)?;
    let patient = with_db(&ctx, move |conn| Ok(patients::create_patient(conn, input)?)).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Patient>, ApiError> {
    require(user.role, Permission::EditClinicData)?;
    let patient = with_db(&ctx, move |conn| Ok(patients::update_patient(conn, id, input)?)).await?;
    Ok(Json(patient))
}

/// Refused with 409 while appointments or medical records reference the patient.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require(user.role, Permission::EditClinicData)?;
    with_db(&ctx, move |conn| Ok(patients::delete_patient(conn, id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
