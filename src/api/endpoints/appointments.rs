//! Appointment endpoints.
//!
//! - `GET /api/appointments`, `POST /api/appointments`
//! - `GET /api/appointments/options`: dropdown data for the booking form
//! - `GET|PUT|DELETE /api/appointments/:id`
//!
//! Booking into a taken doctor slot answers 409 on `appointment_datetime`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::authorization::{require, Permission};
use crate::clinic::appointments;
use crate::models::{AppointmentDetails, AppointmentInput};
use crate::options::{self, OptionLists};

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<AppointmentDetails>,
}

/// `GET /api/appointments`: most recent first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let appointments = with_db(&ctx, move |conn| Ok(appointments::list_appointments(conn)?)).await?;
    Ok(Json(AppointmentsResponse { appointments }))
}

/// `GET /api/appointments/options`: patients, active doctors, statuses.
pub async fn form_options(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<OptionLists>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let options = with_db(&ctx, move |conn| Ok(options::appointment_form_options(conn)?)).await?;
    Ok(Json(options))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentDetails>, ApiError> {
    require(user.role, Permission::ViewClinicData)?;
    let appointment =
        with_db(&ctx, move |conn| Ok(appointments::get_appointment(conn, id)?)).await?;
    Ok(Json(appointment))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(input): Json<AppointmentInput>,
) -> Result<(StatusCode, Json<AppointmentDetails>), ApiError> {
    require(user.role, Permission::EditClinicData)?;
    let appointment =
        with_db(&ctx, move |conn| Ok(appointments::create_appointment(conn, input)?)).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
    Json(input): Json<AppointmentInput>,
) -> Result<Json<AppointmentDetails>, ApiError> {
    require(user.role, Permission::EditClinicData)?;
    let appointment =
        with_db(&ctx, move |conn| Ok(appointments::update_appointment(conn, id, input)?)).await?;
    Ok(Json(appointment))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require(user.role, Permission::EditClinicData)?;
    with_db(&ctx, move |conn| Ok(appointments::delete_appointment(conn, id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
