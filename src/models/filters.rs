use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;

/// Appointment search criteria. Every field is optional; empty lists and
/// blank strings impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub patient_ids: Vec<i64>,
    pub doctor_ids: Vec<i64>,
    pub statuses: Vec<AppointmentStatus>,
    pub patient_last_name: Option<String>,
    pub doctor_last_name: Option<String>,
    pub doctor_specialization: Option<String>,
    pub appointment_type: Option<String>,
    pub diagnosis: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalRecordFilter {
    pub patient_id: Option<i64>,
}
