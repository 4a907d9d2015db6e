use rusqlite::{params, Connection, OptionalExtension, Row};

use super::parse_date;
use crate::db::DatabaseError;
use crate::models::*;

pub(crate) const DOCTOR_COLUMNS: &str =
    "d.id, d.first_name, d.last_name, d.middle_name, d.specialization, d.qualification,
     d.experience_years, d.phone_number, d.email, d.office_number, d.working_hours,
     d.hire_date, d.is_active";

pub(crate) const DOCTOR_COLUMN_COUNT: usize = 13;

pub(crate) fn doctor_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(offset)?,
        first_name: row.get(offset + 1)?,
        last_name: row.get(offset + 2)?,
        middle_name: row.get(offset + 3)?,
        specialization: row.get(offset + 4)?,
        qualification: row.get(offset + 5)?,
        experience_years: row.get(offset + 6)?,
        phone_number: row.get(offset + 7)?,
        email: row.get(offset + 8)?,
        office_number: row.get(offset + 9)?,
        working_hours: row.get(offset + 10)?,
        hire_date: parse_date(row, offset + 11)?,
        is_active: row.get::<_, i32>(offset + 12)? != 0,
    })
}

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (first_name, last_name, middle_name, specialization, qualification,
         experience_years, phone_number, email, office_number, working_hours, hire_date, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            doctor.first_name,
            doctor.last_name,
            doctor.middle_name,
            doctor.specialization,
            doctor.qualification,
            doctor.experience_years,
            doctor.phone_number,
            doctor.email,
            doctor.office_number,
            doctor.working_hours,
            doctor.hire_date.to_string(),
            doctor.is_active as i32,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let sql = format!("SELECT {DOCTOR_COLUMNS} FROM doctors d WHERE d.id = ?1");
    conn.query_row(&sql, params![id], |row| doctor_from_row(row, 0))
        .optional()
        .map_err(DatabaseError::from)
}

/// All doctors ordered by last name.
pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    query_doctors(conn, false)
}

/// Doctors eligible for scheduling, ordered by last name.
pub fn list_active_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    query_doctors(conn, true)
}

fn query_doctors(conn: &Connection, active_only: bool) -> Result<Vec<Doctor>, DatabaseError> {
    let filter = if active_only { "WHERE d.is_active = 1" } else { "" };
    let sql = format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors d {filter}
         ORDER BY d.last_name, d.first_name, d.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| doctor_from_row(row, 0))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE doctors SET first_name = ?2, last_name = ?3, middle_name = ?4,
             specialization = ?5, qualification = ?6, experience_years = ?7, phone_number = ?8,
             email = ?9, office_number = ?10, working_hours = ?11, hire_date = ?12,
             is_active = ?13
             WHERE id = ?1",
            params![
                doctor.id,
                doctor.first_name,
                doctor.last_name,
                doctor.middle_name,
                doctor.specialization,
                doctor.qualification,
                doctor.experience_years,
                doctor.phone_number,
                doctor.email,
                doctor.office_number,
                doctor.working_hours,
                doctor.hire_date.to_string(),
                doctor.is_active as i32,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}

pub fn delete_doctor(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM doctors WHERE id = ?1", params![id])
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}

pub fn doctor_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM doctors WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Existence check with the scheduling predicate: the doctor must be active.
pub fn active_doctor_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM doctors WHERE id = ?1 AND is_active = 1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn count_doctor_dependents(conn: &Connection, id: i64) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM appointments WHERE doctor_id = ?1)
              + (SELECT COUNT(*) FROM medical_records WHERE doctor_id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count)
}
