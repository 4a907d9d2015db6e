use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Doctor, Patient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub record_date: NaiveDate,
    pub diagnosis: Option<String>,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    pub prescriptions: Option<String>,
    pub recommendations: Option<String>,
    pub notes: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecordDetails {
    #[serde(flatten)]
    pub record: MedicalRecord,
    pub patient: Patient,
    pub doctor: Doctor,
}

/// Medical record form payload. `record_date` has no default and must be supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalRecordInput {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub record_date: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    pub prescriptions: Option<String>,
    pub recommendations: Option<String>,
    pub notes: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
}
