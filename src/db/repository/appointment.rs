use rusqlite::{params, Connection, OptionalExtension, Row};

use super::doctor::{doctor_from_row, DOCTOR_COLUMNS};
use super::patient::{patient_from_row, PATIENT_COLUMNS, PATIENT_COLUMN_COUNT};
use super::{format_datetime, parse_datetime, parse_enum, parse_opt_datetime};
use crate::db::DatabaseError;
use crate::models::*;

const APPOINTMENT_COLUMNS: &str =
    "a.id, a.patient_id, a.doctor_id, a.appointment_datetime, a.duration_minutes,
     a.appointment_type, a.complaints, a.status, a.notes, a.created_date, a.updated_date";

const APPOINTMENT_COLUMN_COUNT: usize = 11;

fn appointment_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(offset)?,
        patient_id: row.get(offset + 1)?,
        doctor_id: row.get(offset + 2)?,
        appointment_datetime: parse_datetime(row, offset + 3)?,
        duration_minutes: row.get(offset + 4)?,
        appointment_type: row.get(offset + 5)?,
        complaints: row.get(offset + 6)?,
        status: parse_enum(row, offset + 7)?,
        notes: row.get(offset + 8)?,
        created_date: parse_datetime(row, offset + 9)?,
        updated_date: parse_opt_datetime(row, offset + 10)?,
    })
}

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<AppointmentDetails> {
    let patient_offset = APPOINTMENT_COLUMN_COUNT;
    let doctor_offset = patient_offset + PATIENT_COLUMN_COUNT;
    Ok(AppointmentDetails {
        appointment: appointment_from_row(row, 0)?,
        patient: patient_from_row(row, patient_offset)?,
        doctor: doctor_from_row(row, doctor_offset)?,
    })
}

fn details_select() -> String {
    format!(
        "SELECT {APPOINTMENT_COLUMNS}, {PATIENT_COLUMNS}, {DOCTOR_COLUMNS}
         FROM appointments a
         JOIN patients p ON p.id = a.patient_id
         JOIN doctors d ON d.id = a.doctor_id"
    )
}

/// Insert an appointment. A taken (doctor, date-time) slot surfaces as
/// `DatabaseError::UniqueViolation` on `appointments(doctor_id, appointment_datetime)`.
pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, appointment_datetime, duration_minutes,
         appointment_type, complaints, status, notes, created_date, updated_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.patient_id,
            appt.doctor_id,
            format_datetime(&appt.appointment_datetime),
            appt.duration_minutes,
            appt.appointment_type,
            appt.complaints,
            appt.status.as_str(),
            appt.notes,
            format_datetime(&appt.created_date),
            appt.updated_date.as_ref().map(format_datetime),
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments a WHERE a.id = ?1");
    conn.query_row(&sql, params![id], |row| appointment_from_row(row, 0))
        .optional()
        .map_err(DatabaseError::from)
}

pub fn get_appointment_details(
    conn: &Connection,
    id: i64,
) -> Result<Option<AppointmentDetails>, DatabaseError> {
    let sql = format!("{} WHERE a.id = ?1", details_select());
    conn.query_row(&sql, params![id], details_from_row)
        .optional()
        .map_err(DatabaseError::from)
}

/// Every appointment with patient and doctor loaded in one query,
/// most recent first.
pub fn list_appointment_details(
    conn: &Connection,
) -> Result<Vec<AppointmentDetails>, DatabaseError> {
    let sql = format!(
        "{} ORDER BY a.appointment_datetime DESC, a.id DESC",
        details_select()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], details_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE appointments SET patient_id = ?2, doctor_id = ?3, appointment_datetime = ?4,
             duration_minutes = ?5, appointment_type = ?6, complaints = ?7, status = ?8,
             notes = ?9, updated_date = ?10
             WHERE id = ?1",
            params![
                appt.id,
                appt.patient_id,
                appt.doctor_id,
                format_datetime(&appt.appointment_datetime),
                appt.duration_minutes,
                appt.appointment_type,
                appt.complaints,
                appt.status.as_str(),
                appt.notes,
                appt.updated_date.as_ref().map(format_datetime),
            ],
        )
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}

pub fn delete_appointment(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM appointments WHERE id = ?1", params![id])
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}
