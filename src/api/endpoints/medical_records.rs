//! Medical record endpoints.
//!
//! - `GET /api/medical-records?patient_id=`: newest record date first
//! - `POST /api/medical-records`
//! - `GET|PUT|DELETE /api/medical-records/:id`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::authorization::{require, Permission};
use crate::clinic::medical_records;
use crate::models::{MedicalRecordDetails, MedicalRecordFilter, MedicalRecordInput};

#[derive(Serialize)]
pub struct MedicalRecordsResponse {
    pub medical_records: Vec<MedicalRecordDetails>,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Query(filter): Query<MedicalRecordFilter>,
) -> Result<Json<MedicalRecordsResponse>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let medical_records =
        with_db(&ctx, move |conn| Ok(medical_records::list_medical_records(conn, &filter)?)).await?;
    Ok(Json(MedicalRecordsResponse { medical_records }))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<Json<MedicalRecordDetails>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let medical_record =
        with_db(&ctx, move |conn| Ok(medical_records::get_medical_record(conn, id)?)).await?;
    Ok(Json(medical_record))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(input): Json<MedicalRecordInput>,
) -> Result<(StatusCode, Json<MedicalRecordDetails>), ApiError> {
    require(user.role, Permission::EditClinicData)?;
    let record =
        with_db(&ctx, move |conn| Ok(medical_records::create_medical_record(conn, input)?)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
    Json(input): Json<MedicalRecordInput>,
) -> Result<Json<MedicalRecordDetails>, ApiError> {
    require(user.role, Permission::EditClinicData)?;
    let medical_record = with_db(&ctx, move |conn| {
        Ok(medical_records::update_medical_record(conn, id, input)?)
    })
    .await?;
    Ok(Json(medical_record))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require(user.role, Permission::EditClinicData)?;
    with_db(&ctx, move |conn| Ok(medical_records::delete_medical_record(conn, id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
