//! Appointment booking.
//!
//! A booking must reference an existing patient and an active doctor. The
//! `(doctor_id, appointment_datetime)` unique index is the only guard
//! against double-booking; its violation surfaces as a conflict on
//! `appointment_datetime` and is never retried.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use super::{now, ClinicError};
use crate::db::{self, DatabaseError};
use crate::models::{Appointment, AppointmentDetails, AppointmentInput};
use crate::validation::{normalize_opt, validate_appointment, ValidationErrors};

const ENTITY: &str = "Appointment";

pub const SLOT_TAKEN_MESSAGE: &str =
    "The doctor already has an appointment at this time. Choose another time.";

/// Field checks plus patient/doctor lookups.
///
/// `current_doctor` is the doctor the appointment already belongs to; that
/// doctor is accepted even if since deactivated.
fn check_references(
    conn: &Connection,
    input: &AppointmentInput,
    current_doctor: Option<i64>,
) -> Result<(), ClinicError> {
    let mut errors = validate_appointment(input);
    check_parties(conn, &mut errors, input.patient_id, input.doctor_id, current_doctor)?;
    Ok(errors.into_result()?)
}

/// Shared with medical records: unknown patient and unknown or inactive
/// doctor are user-correctable validation errors.
pub(crate) fn check_parties(
    conn: &Connection,
    errors: &mut ValidationErrors,
    patient_id: i64,
    doctor_id: i64,
    current_doctor: Option<i64>,
) -> Result<(), DatabaseError> {
    if patient_id > 0 && !db::patient_exists(conn, patient_id)? {
        errors.add("patient_id", "Patient not found");
    }
    if doctor_id > 0 {
        let acceptable = if current_doctor == Some(doctor_id) {
            db::doctor_exists(conn, doctor_id)?
        } else {
            db::active_doctor_exists(conn, doctor_id)?
        };
        if !acceptable {
            errors.add("doctor_id", "Doctor not found or inactive");
        }
    }
    Ok(())
}

fn map_write(err: DatabaseError) -> ClinicError {
    if err.is_unique_violation("appointments", &["doctor_id", "appointment_datetime"]) {
        ClinicError::conflict("appointment_datetime", SLOT_TAKEN_MESSAGE)
    } else {
        ClinicError::Database(err)
    }
}

fn build(
    id: i64,
    input: AppointmentInput,
    created: NaiveDateTime,
) -> Result<Appointment, ClinicError> {
    let Some(appointment_datetime) = input.appointment_datetime else {
        return Err(ValidationErrors::single(
            "appointment_datetime",
            "Appointment date and time are required",
        )
        .into());
    };
    Ok(Appointment {
        id,
        patient_id: input.patient_id,
        doctor_id: input.doctor_id,
        appointment_datetime,
        duration_minutes: input.duration_minutes,
        appointment_type: normalize_opt(input.appointment_type),
        complaints: normalize_opt(input.complaints),
        status: input.status,
        notes: normalize_opt(input.notes),
        created_date: created,
        updated_date: None,
    })
}

pub fn create_appointment(
    conn: &Connection,
    input: AppointmentInput,
) -> Result<AppointmentDetails, ClinicError> {
    check_references(conn, &input, None)?;
    let appt = build(0, input, now())?;
    let id = db::insert_appointment(conn, &appt).map_err(map_write)?;
    tracing::info!(
        appointment_id = id,
        doctor_id = appt.doctor_id,
        patient_id = appt.patient_id,
        "Appointment booked"
    );
    get_appointment(conn, id)
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<AppointmentDetails, ClinicError> {
    db::get_appointment_details(conn, id)?.ok_or(ClinicError::NotFound { entity: ENTITY, id })
}

/// Every appointment, most recent first.
pub fn list_appointments(conn: &Connection) -> Result<Vec<AppointmentDetails>, ClinicError> {
    Ok(db::list_appointment_details(conn)?)
}

/// Full replacement that re-validates patient and doctor.
pub fn update_appointment(
    conn: &Connection,
    id: i64,
    input: AppointmentInput,
) -> Result<AppointmentDetails, ClinicError> {
    let existing =
        db::get_appointment(conn, id)?.ok_or(ClinicError::NotFound { entity: ENTITY, id })?;
    check_references(conn, &input, Some(existing.doctor_id))?;

    let mut appt = build(id, input, existing.created_date)?;
    appt.updated_date = Some(now());
    if !db::update_appointment(conn, &appt).map_err(map_write)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    tracing::info!(appointment_id = id, status = appt.status.as_str(), "Appointment updated");
    get_appointment(conn, id)
}

pub fn delete_appointment(conn: &Connection, id: i64) -> Result<(), ClinicError> {
    if !db::delete_appointment(conn, id)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    tracing::info!(appointment_id = id, "Appointment deleted");
    Ok(())
}
