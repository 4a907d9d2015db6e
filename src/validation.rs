//! Field-level input validation for clinic forms.
//!
//! Validators never touch the database. Referential checks (unknown patient,
//! inactive doctor) are added by the service layer onto the same
//! [`ValidationErrors`] so the caller gets one field-keyed report.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{AppointmentInput, DoctorInput, MedicalRecordInput, PatientInput};

/// Upper bound for free-text fields.
pub const MAX_TEXT_LEN: usize = 1000;
pub const MAX_EXPERIENCE_YEARS: i32 = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 16;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Loose phone format: optional leading `+`, digits and separators.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9(][0-9\s\-()]{5,18}[0-9]$").unwrap());

/// Ukrainian mobile format required for accounts.
static UA_PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+380\d{9}$").unwrap());

/// Field name → messages. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    /// `Ok(())` when nothing was reported.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Trim, mapping blank to `None`.
pub fn normalize_opt(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

pub fn is_valid_ua_phone(value: &str) -> bool {
    UA_PHONE_PATTERN.is_match(value)
}

fn required(errors: &mut ValidationErrors, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
    }
}

fn max_len(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if value.is_some_and(|v| v.chars().count() > MAX_TEXT_LEN) {
        errors.add(field, format!("Must not exceed {MAX_TEXT_LEN} characters"));
    }
}

fn phone(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !value.trim().is_empty() && !is_valid_phone(value.trim()) {
        errors.add(field, "Invalid phone number format");
    }
}

fn optional_email(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if let Some(email) = value.map(str::trim).filter(|e| !e.is_empty()) {
        if !is_valid_email(email) {
            errors.add(field, "Invalid email format");
        }
    }
}

pub fn validate_patient(input: &PatientInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    required(&mut errors, "first_name", &input.first_name, "First name");
    required(&mut errors, "last_name", &input.last_name, "Last name");
    if input.date_of_birth.is_none() {
        errors.add("date_of_birth", "Date of birth is required");
    }
    required(&mut errors, "gender", &input.gender, "Gender");
    required(&mut errors, "phone_number", &input.phone_number, "Phone number");
    phone(&mut errors, "phone_number", &input.phone_number);
    optional_email(&mut errors, "email", input.email.as_deref());
    max_len(&mut errors, "address", input.address.as_deref());
    errors
}

pub fn validate_doctor(input: &DoctorInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    required(&mut errors, "first_name", &input.first_name, "First name");
    required(&mut errors, "last_name", &input.last_name, "Last name");
    required(&mut errors, "specialization", &input.specialization, "Specialization");
    required(&mut errors, "qualification", &input.qualification, "Qualification");
    if !(0..=MAX_EXPERIENCE_YEARS).contains(&input.experience_years) {
        errors.add(
            "experience_years",
            format!("Experience must be between 0 and {MAX_EXPERIENCE_YEARS} years"),
        );
    }
    required(&mut errors, "phone_number", &input.phone_number, "Phone number");
    phone(&mut errors, "phone_number", &input.phone_number);
    optional_email(&mut errors, "email", input.email.as_deref());
    errors
}

pub fn validate_appointment(input: &AppointmentInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if input.patient_id <= 0 {
        errors.add("patient_id", "Patient is required");
    }
    if input.doctor_id <= 0 {
        errors.add("doctor_id", "Doctor is required");
    }
    if input.appointment_datetime.is_none() {
        errors.add("appointment_datetime", "Appointment date and time are required");
    }
    if input.duration_minutes <= 0 {
        errors.add("duration_minutes", "Duration must be positive");
    }
    max_len(&mut errors, "complaints", input.complaints.as_deref());
    max_len(&mut errors, "notes", input.notes.as_deref());
    errors
}

pub fn validate_medical_record(input: &MedicalRecordInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if input.patient_id <= 0 {
        errors.add("patient_id", "Patient is required");
    }
    if input.doctor_id <= 0 {
        errors.add("doctor_id", "Doctor is required");
    }
    if input.record_date.is_none() {
        errors.add("record_date", "Record date is required");
    }
    for (field, value) in [
        ("diagnosis", &input.diagnosis),
        ("symptoms", &input.symptoms),
        ("treatment", &input.treatment),
        ("prescriptions", &input.prescriptions),
        ("recommendations", &input.recommendations),
        ("notes", &input.notes),
    ] {
        max_len(&mut errors, field, value.as_deref());
    }
    errors
}

/// Account registration fields, checked before any lookup.
pub struct RegistrationFields<'a> {
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

pub fn validate_registration(fields: &RegistrationFields<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    required(&mut errors, "last_name", fields.last_name, "Last name");
    required(&mut errors, "first_name", fields.first_name, "First name");
    required(&mut errors, "email", fields.email, "Email");
    if !fields.email.trim().is_empty() && !is_valid_email(fields.email.trim()) {
        errors.add("email", "Invalid email format");
    }
    required(&mut errors, "phone", fields.phone, "Phone");
    if !fields.phone.trim().is_empty() && !is_valid_ua_phone(fields.phone.trim()) {
        errors.add("phone", "Phone must be in the format +380XXXXXXXXX");
    }
    let len = fields.password.chars().count();
    if len == 0 {
        errors.add("password", "Password is required");
    } else if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        errors.add(
            "password",
            format!("Password must be {PASSWORD_MIN_LEN} to {PASSWORD_MAX_LEN} characters long"),
        );
    }
    if fields.confirm_password != fields.password {
        errors.add("confirm_password", "Passwords do not match");
    }
    errors
}
