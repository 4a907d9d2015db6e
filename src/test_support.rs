//! Fixture builders shared by unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::enums::{AppointmentStatus, Role};
use crate::models::*;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, s).unwrap()
}

pub fn patient(last_name: &str, phone: &str) -> Patient {
    Patient {
        id: 0,
        first_name: "Олена".into(),
        last_name: last_name.into(),
        middle_name: Some("Петрівна".into()),
        date_of_birth: date(1985, 3, 14),
        gender: "F".into(),
        phone_number: phone.into(),
        email: None,
        address: None,
        insurance_number: None,
        registration_date: datetime(2024, 1, 15, 10, 0, 0),
    }
}

pub fn doctor(last_name: &str, specialization: &str, is_active: bool) -> Doctor {
    Doctor {
        id: 0,
        first_name: "Андрій".into(),
        last_name: last_name.into(),
        middle_name: None,
        specialization: specialization.into(),
        qualification: "Вища категорія".into(),
        experience_years: 12,
        phone_number: "+380671234567".into(),
        email: None,
        office_number: Some("204".into()),
        working_hours: Some("09:00-17:00".into()),
        hire_date: date(2015, 9, 1),
        is_active,
    }
}

pub fn appointment(patient_id: i64, doctor_id: i64, at: NaiveDateTime) -> Appointment {
    Appointment {
        id: 0,
        patient_id,
        doctor_id,
        appointment_datetime: at,
        duration_minutes: DEFAULT_DURATION_MINUTES,
        appointment_type: Some("Первинний".into()),
        complaints: None,
        status: AppointmentStatus::Scheduled,
        notes: None,
        created_date: datetime(2024, 12, 1, 8, 0, 0),
        updated_date: None,
    }
}

pub fn medical_record(patient_id: i64, doctor_id: i64, diagnosis: Option<&str>) -> MedicalRecord {
    MedicalRecord {
        id: 0,
        patient_id,
        doctor_id,
        record_date: date(2025, 2, 3),
        diagnosis: diagnosis.map(str::to_string),
        symptoms: None,
        treatment: None,
        prescriptions: None,
        recommendations: None,
        notes: None,
        next_visit_date: None,
    }
}

pub fn user(email: &str, role: Role) -> User {
    User {
        id: 0,
        email: email.into(),
        full_name: "Гончар Ірина".into(),
        phone: "+380931234567".into(),
        password_hash: "pbkdf2-sha256$1000$c2FsdA$aGFzaA".into(),
        role,
        created_date: datetime(2024, 1, 1, 0, 0, 0),
        last_login_date: None,
        is_active: true,
    }
}
