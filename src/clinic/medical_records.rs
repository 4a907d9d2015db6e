use rusqlite::Connection;

use super::appointments::check_parties;
use super::ClinicError;
use crate::db;
use crate::models::{MedicalRecord, MedicalRecordDetails, MedicalRecordFilter, MedicalRecordInput};
use crate::validation::{normalize_opt, validate_medical_record, ValidationErrors};

const ENTITY: &str = "Medical record";

fn check(
    conn: &Connection,
    input: &MedicalRecordInput,
    current_doctor: Option<i64>,
) -> Result<(), ClinicError> {
    let mut errors = validate_medical_record(input);
    check_parties(conn, &mut errors, input.patient_id, input.doctor_id, current_doctor)?;
    Ok(errors.into_result()?)
}

fn build(id: i64, input: MedicalRecordInput) -> Result<MedicalRecord, ClinicError> {
    // No default: a record without an explicit date is rejected.
    let Some(record_date) = input.record_date else {
        return Err(ValidationErrors::single("record_date", "Record date is required").into());
    };
    Ok(MedicalRecord {
        id,
        patient_id: input.patient_id,
        doctor_id: input.doctor_id,
        record_date,
        diagnosis: normalize_opt(input.diagnosis),
        symptoms: normalize_opt(input.symptoms),
        treatment: normalize_opt(input.treatment),
        prescriptions: normalize_opt(input.prescriptions),
        recommendations: normalize_opt(input.recommendations),
        notes: normalize_opt(input.notes),
        next_visit_date: input.next_visit_date,
    })
}

pub fn create_medical_record(
    conn: &Connection,
    input: MedicalRecordInput,
) -> Result<MedicalRecordDetails, ClinicError> {
    check(conn, &input, None)?;
    let record = build(0, input)?;
    let id = db::insert_medical_record(conn, &record)?;
    tracing::info!(record_id = id, patient_id = record.patient_id, "Medical record created");
    get_medical_record(conn, id)
}

pub fn get_medical_record(conn: &Connection, id: i64) -> Result<MedicalRecordDetails, ClinicError> {
    db::get_medical_record_details(conn, id)?.ok_or(ClinicError::NotFound { entity: ENTITY, id })
}

/// Newest record date first, optionally narrowed to one patient.
pub fn list_medical_records(
    conn: &Connection,
    filter: &MedicalRecordFilter,
) -> Result<Vec<MedicalRecordDetails>, ClinicError> {
    Ok(db::list_medical_record_details(conn, filter)?)
}

pub fn update_medical_record(
    conn: &Connection,
    id: i64,
    input: MedicalRecordInput,
) -> Result<MedicalRecordDetails, ClinicError> {
    let existing =
        db::get_medical_record(conn, id)?.ok_or(ClinicError::NotFound { entity: ENTITY, id })?;
    check(conn, &input, Some(existing.doctor_id))?;
    let record = build(id, input)?;
    if !db::update_medical_record(conn, &record)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    tracing::info!(record_id = id, "Medical record updated");
    get_medical_record(conn, id)
}

pub fn delete_medical_record(conn: &Connection, id: i64) -> Result<(), ClinicError> {
    if !db::delete_medical_record(conn, id)? {
        return Err(ClinicError::NotFound { entity: ENTITY, id });
    }
    tracing::info!(record_id = id, "Medical record deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::test_support::*;

    fn setup() -> (Connection, i64, i64) {
        let conn = open_memory_database().unwrap();
        let p = db::insert_patient(&conn, &patient("Бондар", "+380501112233")).unwrap();
        let d = db::insert_doctor(&conn, &doctor("Іваненко", "Кардіолог", true)).unwrap();
        (conn, p, d)
    }

    fn input(patient_id: i64, doctor_id: i64) -> MedicalRecordInput {
        MedicalRecordInput {
            patient_id,
            doctor_id,
            record_date: Some(date(2025, 2, 3)),
            diagnosis: Some("Гіпертонія".into()),
            treatment: Some("Дієта, контроль тиску".into()),
            next_visit_date: Some(date(2025, 3, 3)),
            ..Default::default()
        }
    }

    #[test]
    fn create_and_fetch_details() {
        let (conn, p, d) = setup();
        let created = create_medical_record(&conn, input(p, d)).unwrap();
        assert_eq!(created.record.diagnosis.as_deref(), Some("Гіпертонія"));
        assert_eq!(created.patient.id, p);
        assert_eq!(created.doctor.id, d);
        assert_eq!(get_medical_record(&conn, created.record.id).unwrap(), created);
    }

    #[test]
    fn record_without_date_is_rejected() {
        let (conn, p, d) = setup();
        let mut missing = input(p, d);
        missing.record_date = None;
        match create_medical_record(&conn, missing).unwrap_err() {
            ClinicError::Validation(errors) => assert!(errors.has("record_date")),
            other => panic!("expected validation error, got {other:?}"),
        }
        let all = list_medical_records(&conn, &MedicalRecordFilter::default()).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn inactive_doctor_and_missing_patient_are_rejected() {
        let (conn, _p, _d) = setup();
        let retired = db::insert_doctor(&conn, &doctor("Сидоренко", "Невролог", false)).unwrap();
        match create_medical_record(&conn, input(777, retired)).unwrap_err() {
            ClinicError::Validation(errors) => {
                assert!(errors.has("patient_id"));
                assert!(errors.has("doctor_id"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn list_filters_by_patient() {
        let (conn, p, d) = setup();
        let other = db::insert_patient(&conn, &patient("Мельник", "+380501112244")).unwrap();
        create_medical_record(&conn, input(p, d)).unwrap();
        create_medical_record(&conn, input(other, d)).unwrap();

        let filter = MedicalRecordFilter {
            patient_id: Some(other),
        };
        let records = list_medical_records(&conn, &filter).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].patient.last_name, "Мельник");
        assert_eq!(
            list_medical_records(&conn, &MedicalRecordFilter::default()).unwrap().len(),
            2
        );
    }

    #[test]
    fn update_replaces_fields() {
        let (conn, p, d) = setup();
        let created = create_medical_record(&conn, input(p, d)).unwrap();
        let mut changed = input(p, d);
        changed.diagnosis = Some("Гіпертонія II ступеня".into());
        changed.treatment = None;
        let updated = update_medical_record(&conn, created.record.id, changed).unwrap();
        assert_eq!(updated.record.diagnosis.as_deref(), Some("Гіпертонія II ступеня"));
        assert_eq!(updated.record.treatment, None);
    }

    #[test]
    fn delete_then_not_found() {
        let (conn, p, d) = setup();
        let created = create_medical_record(&conn, input(p, d)).unwrap();
        delete_medical_record(&conn, created.record.id).unwrap();
        assert!(matches!(
            delete_medical_record(&conn, created.record.id).unwrap_err(),
            ClinicError::NotFound { .. }
        ));
    }
}
