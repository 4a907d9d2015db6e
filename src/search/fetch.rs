//! Candidate retrieval for appointment search.

use rusqlite::Connection;

use super::predicate::Fragment;
use super::{compose, SearchResults};
use crate::db::{list_appointment_details, list_patient_diagnoses, DatabaseError};
use crate::models::{AppointmentDetails, SearchCriteria};

/// Request-scoped snapshot the composer filters.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Every appointment with patient and doctor loaded.
    pub appointments: Vec<AppointmentDetails>,
    /// `(patient_id, diagnosis)` pairs. Only loaded when the criteria
    /// filter on diagnosis.
    pub diagnoses: Vec<(i64, String)>,
}

/// Two queries at most: the joined appointment list, and the diagnosis
/// pairs when a diagnosis fragment is supplied.
pub fn load_candidates(
    conn: &Connection,
    criteria: &SearchCriteria,
) -> Result<CandidateSet, DatabaseError> {
    let appointments = list_appointment_details(conn)?;
    let diagnoses = if Fragment::parse(criteria.diagnosis.as_deref()).is_some() {
        list_patient_diagnoses(conn)?
    } else {
        Vec::new()
    };
    Ok(CandidateSet {
        appointments,
        diagnoses,
    })
}

/// Load candidates and compose the search.
pub fn run_search(
    conn: &Connection,
    criteria: SearchCriteria,
) -> Result<SearchResults, DatabaseError> {
    let candidates = load_candidates(conn, &criteria)?;
    let results = compose(criteria, &candidates);
    tracing::debug!(
        candidates = candidates.appointments.len(),
        returned = results.total_results,
        "Appointment search composed"
    );
    Ok(results)
}
