use chrono::NaiveDateTime;
use rusqlite::Connection;

use super::{now, ClinicError};
use crate::db::{self, DatabaseError};
use crate::models::{Patient, PatientInput};
use crate::validation::{normalize_opt, validate_patient, ValidationErrors};

const ENTITY: &str = "Patient";

fn build(
    id: i64,
    input: PatientInput,
    registered: NaiveDateTime,
) -> Result<Patient, ClinicError> {
    validate_patient(&input).into_result()?;
    let Some(date_of_birth) = input.date_of_birth else {
        return Err(ValidationErrors::single("date_of_birth", "Date of birth is required").into());
    };
    Ok(Patient {
        id,
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        middle_name: normalize_opt(input.middle_name),
        date_of_birth,
        gender: input.gender.trim().to_string(),
        phone_number: input.phone_number.trim().to_string(),
        email: normalize_opt(input.email),
        address: normalize_opt(input.address),
        insurance_number: normalize_opt(input.insurance_number),
        registration_date: input.registration_date.unwrap_or(registered),
    })
}

fn map_write(err: DatabaseError) -> ClinicError {
    if err.is_unique_violation("patients", &["phone_number"]) {
        ClinicError::conflict("phone_number", "A patient with this phone number already exists")
    } else if err.is_unique_violation("patients", &["email"]) {
        ClinicError::conflict("email", "A patient with this email already exists")
    } else {
        ClinicError::Database(err)
    }
}

pub fn create_patient(conn: &Connection, input: PatientInput) -> Result<Patient, ClinicError> {
    let mut patient = build(0, input, now())?;
    patient.id = db::insert_patient(conn, &patient).map_err(map_write)?;
    tracing::info!(patient_id = patient.id, "Patient registered");
    Ok(patient)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, ClinicError> {
    db::get_patient(conn, id)?.ok_or(ClinicError::NotFound { entity: ENTITY, id })
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, ClinicError> {
    Ok(db::list_patients(conn)?)
}

/// Full replacement. The registration date is kept unless supplied.
pub fn update_patient(
    conn: &Connection,
    id: i64,
    input: PatientInput,
) -> Result<Patient, ClinicError> {
    let existing = get_patient(conn, id)?;
    let patient = build(id, input, existing.registration_date)?;
    if !db::update_patient(conn, &patient).map_err(map_write)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    tracing::info!(patient_id = id, "Patient updated");
    Ok(patient)
}

/// Refused while any appointment or medical record references the patient.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), ClinicError> {
    let tx = conn.unchecked_transaction()?;
    if !db::patient_exists(&tx, id)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    if db::count_patient_dependents(&tx, id)? > 0 {
        return Err(ClinicError::HasDependents { entity: ENTITY, id });
    }
    db::delete_patient(&tx, id).map_err(|e| match e {
        DatabaseError::ForeignKeyViolation(_) => ClinicError::HasDependents { entity: ENTITY, id },
        other => ClinicError::Database(other),
    })?;
    tx.commit()?;
    tracing::info!(patient_id = id, "Patient deleted");
    Ok(())
}
