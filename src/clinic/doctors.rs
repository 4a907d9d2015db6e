use chrono::NaiveDate;
use rusqlite::Connection;

use super::{now, ClinicError};
use crate::db::{self, DatabaseError};
use crate::models::{Doctor, DoctorInput};
use crate::validation::{normalize_opt, validate_doctor};

const ENTITY: &str = "Doctor";

fn build(id: i64, input: DoctorInput, hired: NaiveDate) -> Result<Doctor, ClinicError> {
    validate_doctor(&input).into_result()?;
    Ok(Doctor {
        id,
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        middle_name: normalize_opt(input.middle_name),
        specialization: input.specialization.trim().to_string(),
        qualification: input.qualification.trim().to_string(),
        experience_years: input.experience_years,
        phone_number: input.phone_number.trim().to_string(),
        email: normalize_opt(input.email),
        office_number: normalize_opt(input.office_number),
        working_hours: normalize_opt(input.working_hours),
        hire_date: input.hire_date.unwrap_or(hired),
        is_active: input.is_active,
    })
}

fn map_write(err: DatabaseError) -> ClinicError {
    if err.is_unique_violation("doctors", &["email"]) {
        ClinicError::conflict("email", "A doctor with this email already exists")
    } else {
        ClinicError::Database(err)
    }
}

pub fn create_doctor(conn: &Connection, input: DoctorInput) -> Result<Doctor, ClinicError> {
    let mut doctor = build(0, input, now().date())?;
    doctor.id = db::insert_doctor(conn, &doctor).map_err(map_write)?;
    tracing::info!(doctor_id = doctor.id, "Doctor added");
    Ok(doctor)
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Doctor, ClinicError> {
    db::get_doctor(conn, id)?.ok_or(ClinicError::NotFound { entity: ENTITY, id })
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, ClinicError> {
    Ok(db::list_doctors(conn)?)
}

/// Full replacement. Deactivating a doctor keeps their history intact.
pub fn update_doctor(
    conn: &Connection,
    id: i64,
    input: DoctorInput,
) -> Result<Doctor, ClinicError> {
    let existing = get_doctor(conn, id)?;
    let doctor = build(id, input, existing.hire_date)?;
    if !db::update_doctor(conn, &doctor).map_err(map_write)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    if existing.is_active && !doctor.is_active {
        tracing::info!(doctor_id = id, "Doctor deactivated");
    } else {
        tracing::info!(doctor_id = id, "Doctor updated");
    }
    Ok(doctor)
}

/// Refused while any appointment or medical record references the doctor.
pub fn delete_doctor(conn: &Connection, id: i64) -> Result<(), ClinicError> {
    let tx = conn.unchecked_transaction()?;
    if !db::doctor_exists(&tx, id)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    if db::count_doctor_dependents(&tx, id)? > 0 {
        return Err(ClinicError::HasDependents { entity: ENTITY, id });
    }
    db::delete_doctor(&tx, id).map_err(|e| match e {
        DatabaseError::ForeignKeyViolation(_) => ClinicError::HasDependents { entity: ENTITY, id },
        other => ClinicError::Database(other),
    })?;
    tx.commit()?;
    tracing::info!(doctor_id = id, "Doctor deleted");
    Ok(())
}
