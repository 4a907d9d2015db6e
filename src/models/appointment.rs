use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::{Doctor, Patient};

/// Default visit length in minutes.
pub const DEFAULT_DURATION_MINUTES: i32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_datetime: NaiveDateTime,
    pub duration_minutes: i32,
    pub appointment_type: Option<String>,
    pub complaints: Option<String>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_date: NaiveDateTime,
    pub updated_date: Option<NaiveDateTime>,
}

/// Appointment with its patient and doctor loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: Patient,
    pub doctor: Doctor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentInput {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_datetime: Option<NaiveDateTime>,
    pub duration_minutes: i32,
    pub appointment_type: Option<String>,
    pub complaints: Option<String>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl Default for AppointmentInput {
    fn default() -> Self {
        Self {
            patient_id: 0,
            doctor_id: 0,
            appointment_datetime: None,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            appointment_type: None,
            complaints: None,
            status: AppointmentStatus::default(),
            notes: None,
        }
    }
}
