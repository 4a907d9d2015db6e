use rusqlite::{params, Connection, OptionalExtension, Row};

use super::doctor::{doctor_from_row, DOCTOR_COLUMNS};
use super::patient::{patient_from_row, PATIENT_COLUMNS, PATIENT_COLUMN_COUNT};
use super::{parse_date, parse_opt_date};
use crate::db::DatabaseError;
use crate::models::*;

const RECORD_COLUMNS: &str =
    "m.id, m.patient_id, m.doctor_id, m.record_date, m.diagnosis, m.symptoms, m.treatment,
     m.prescriptions, m.recommendations, m.notes, m.next_visit_date";

const RECORD_COLUMN_COUNT: usize = 11;

fn record_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<MedicalRecord> {
    Ok(MedicalRecord {
        id: row.get(offset)?,
        patient_id: row.get(offset + 1)?,
        doctor_id: row.get(offset + 2)?,
        record_date: parse_date(row, offset + 3)?,
        diagnosis: row.get(offset + 4)?,
        symptoms: row.get(offset + 5)?,
        treatment: row.get(offset + 6)?,
        prescriptions: row.get(offset + 7)?,
        recommendations: row.get(offset + 8)?,
        notes: row.get(offset + 9)?,
        next_visit_date: parse_opt_date(row, offset + 10)?,
    })
}

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalRecordDetails> {
    let patient_offset = RECORD_COLUMN_COUNT;
    let doctor_offset = patient_offset + PATIENT_COLUMN_COUNT;
    Ok(MedicalRecordDetails {
        record: record_from_row(row, 0)?,
        patient: patient_from_row(row, patient_offset)?,
        doctor: doctor_from_row(row, doctor_offset)?,
    })
}

fn details_select() -> String {
    format!(
        "SELECT {RECORD_COLUMNS}, {PATIENT_COLUMNS}, {DOCTOR_COLUMNS}
         FROM medical_records m
         JOIN patients p ON p.id = m.patient_id
         JOIN doctors d ON d.id = m.doctor_id"
    )
}

pub fn insert_medical_record(
    conn: &Connection,
    record: &MedicalRecord,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO medical_records (patient_id, doctor_id, record_date, diagnosis, symptoms,
         treatment, prescriptions, recommendations, notes, next_visit_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.patient_id,
            record.doctor_id,
            record.record_date.to_string(),
            record.diagnosis,
            record.symptoms,
            record.treatment,
            record.prescriptions,
            record.recommendations,
            record.notes,
            record.next_visit_date.map(|d| d.to_string()),
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_medical_record(
    conn: &Connection,
    id: i64,
) -> Result<Option<MedicalRecord>, DatabaseError> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM medical_records m WHERE m.id = ?1");
    conn.query_row(&sql, params![id], |row| record_from_row(row, 0))
        .optional()
        .map_err(DatabaseError::from)
}

pub fn get_medical_record_details(
    conn: &Connection,
    id: i64,
) -> Result<Option<MedicalRecordDetails>, DatabaseError> {
    let sql = format!("{} WHERE m.id = ?1", details_select());
    conn.query_row(&sql, params![id], details_from_row)
        .optional()
        .map_err(DatabaseError::from)
}

/// Medical records with patient and doctor, newest record date first.
pub fn list_medical_record_details(
    conn: &Connection,
    filter: &MedicalRecordFilter,
) -> Result<Vec<MedicalRecordDetails>, DatabaseError> {
    let order = "ORDER BY m.record_date DESC, m.id DESC";
    match filter.patient_id {
        Some(patient_id) => {
            let sql = format!("{} WHERE m.patient_id = ?1 {order}", details_select());
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![patient_id], details_from_row)?;
            rows.map(|r| r.map_err(DatabaseError::from)).collect()
        }
        None => {
            let sql = format!("{} {order}", details_select());
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], details_from_row)?;
            rows.map(|r| r.map_err(DatabaseError::from)).collect()
        }
    }
}

/// `(patient_id, diagnosis)` for every record that carries a diagnosis.
///
/// SQLite's `LOWER` only folds ASCII, so fragment matching against these
/// pairs happens in Rust.
pub fn list_patient_diagnoses(conn: &Connection) -> Result<Vec<(i64, String)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, diagnosis FROM medical_records
         WHERE diagnosis IS NOT NULL AND diagnosis <> ''",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_medical_record(
    conn: &Connection,
    record: &MedicalRecord,
) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE medical_records SET patient_id = ?2, doctor_id = ?3, record_date = ?4,
             diagnosis = ?5, symptoms = ?6, treatment = ?7, prescriptions = ?8,
             recommendations = ?9, notes = ?10, next_visit_date = ?11
             WHERE id = ?1",
            params![
                record.id,
                record.patient_id,
                record.doctor_id,
                record.record_date.to_string(),
                record.diagnosis,
                record.symptoms,
                record.treatment,
                record.prescriptions,
                record.recommendations,
                record.notes,
                record.next_visit_date.map(|d| d.to_string()),
            ],
        )
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}

pub fn delete_medical_record(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM medical_records WHERE id = ?1", params![id])
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}
