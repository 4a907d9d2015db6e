//! Clinic services: validated CRUD over patients, doctors, appointments
//! and medical records.
//!
//! Services sit between the HTTP layer and the repositories: they validate
//! input, run referential checks, and translate storage failures into the
//! conditions a user can act on (`Validation`, `Conflict`, `HasDependents`).

pub mod appointments;
pub mod doctors;
pub mod medical_records;
pub mod patients;

use chrono::{Local, NaiveDateTime, Timelike};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{message}")]
    Conflict { field: String, message: String },

    #[error("{entity} {id} has dependent records and cannot be deleted")]
    HasDependents { entity: &'static str, id: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ValidationErrors> for ClinicError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<rusqlite::Error> for ClinicError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::from(err))
    }
}

impl ClinicError {
    pub(crate) fn conflict(field: &str, message: &str) -> Self {
        Self::Conflict {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Current local time at second precision, the resolution stored in SQLite.
pub(crate) fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
