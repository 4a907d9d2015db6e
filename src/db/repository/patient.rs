use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_datetime, parse_date, parse_datetime};
use crate::db::DatabaseError;
use crate::models::*;

pub(crate) const PATIENT_COLUMNS: &str =
    "p.id, p.first_name, p.last_name, p.middle_name, p.date_of_birth, p.gender,
     p.phone_number, p.email, p.address, p.insurance_number, p.registration_date";

pub(crate) const PATIENT_COLUMN_COUNT: usize = 11;

pub(crate) fn patient_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(offset)?,
        first_name: row.get(offset + 1)?,
        last_name: row.get(offset + 2)?,
        middle_name: row.get(offset + 3)?,
        date_of_birth: parse_date(row, offset + 4)?,
        gender: row.get(offset + 5)?,
        phone_number: row.get(offset + 6)?,
        email: row.get(offset + 7)?,
        address: row.get(offset + 8)?,
        insurance_number: row.get(offset + 9)?,
        registration_date: parse_datetime(row, offset + 10)?,
    })
}

/// Insert a patient. The `id` field is ignored; the new id is returned.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (first_name, last_name, middle_name, date_of_birth, gender,
         phone_number, email, address, insurance_number, registration_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            patient.first_name,
            patient.last_name,
            patient.middle_name,
            patient.date_of_birth.to_string(),
            patient.gender,
            patient.phone_number,
            patient.email,
            patient.address,
            patient.insurance_number,
            format_datetime(&patient.registration_date),
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients p WHERE p.id = ?1");
    conn.query_row(&sql, params![id], |row| patient_from_row(row, 0))
        .optional()
        .map_err(DatabaseError::from)
}

/// All patients ordered by last name, then first name.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let sql = format!(
        "SELECT {PATIENT_COLUMNS} FROM patients p ORDER BY p.last_name, p.first_name, p.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| patient_from_row(row, 0))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Full-record replacement. Returns `false` when no patient has this id.
pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE patients SET first_name = ?2, last_name = ?3, middle_name = ?4,
             date_of_birth = ?5, gender = ?6, phone_number = ?7, email = ?8, address = ?9,
             insurance_number = ?10, registration_date = ?11
             WHERE id = ?1",
            params![
                patient.id,
                patient.first_name,
                patient.last_name,
                patient.middle_name,
                patient.date_of_birth.to_string(),
                patient.gender,
                patient.phone_number,
                patient.email,
                patient.address,
                patient.insurance_number,
                format_datetime(&patient.registration_date),
            ],
        )
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM patients WHERE id = ?1", params![id])
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}

pub fn patient_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Number of appointments plus medical records that reference this patient.
pub fn count_patient_dependents(conn: &Connection, id: i64) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM appointments WHERE patient_id = ?1)
              + (SELECT COUNT(*) FROM medical_records WHERE patient_id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count)
}
