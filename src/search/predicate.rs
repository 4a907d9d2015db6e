//! Criterion → predicate translation.
//!
//! Every supplied criterion becomes one owned closure; absent criteria
//! produce nothing. The caller ANDs the list together.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::enums::AppointmentStatus;
use crate::models::{AppointmentDetails, SearchCriteria};

pub type Predicate = Box<dyn Fn(&AppointmentDetails) -> bool + Send + Sync>;

/// A trimmed, lower-cased search fragment. Blank input yields no fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    /// Case-insensitive containment.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    /// Absent text never matches.
    pub fn matches_opt(&self, haystack: Option<&str>) -> bool {
        haystack.is_some_and(|h| self.matches(h))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59 of `date`: next midnight minus one second.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date)
        .checked_add_signed(Duration::days(1))
        .and_then(|next| next.checked_sub_signed(Duration::seconds(1)))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Patient ids having at least one diagnosis that contains `fragment`.
pub fn patients_with_diagnosis(diagnoses: &[(i64, String)], fragment: &Fragment) -> HashSet<i64> {
    diagnoses
        .iter()
        .filter(|(_, diagnosis)| fragment.matches(diagnosis))
        .map(|(patient_id, _)| *patient_id)
        .collect()
}

/// Build one predicate per supplied criterion.
///
/// `diagnosed` is the precomputed patient-id set for the diagnosis
/// criterion; pass `None` when that criterion is absent.
pub fn build_predicates(
    criteria: &SearchCriteria,
    diagnosed: Option<HashSet<i64>>,
) -> Vec<Predicate> {
    let mut predicates: Vec<Predicate> = Vec::new();

    if let Some(from) = criteria.date_from.map(start_of_day) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            a.appointment.appointment_datetime >= from
        }));
    }
    if let Some(to) = criteria.date_to.map(end_of_day) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            a.appointment.appointment_datetime <= to
        }));
    }

    if let Some(ids) = id_set(&criteria.patient_ids) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            ids.contains(&a.appointment.patient_id)
        }));
    }
    if let Some(ids) = id_set(&criteria.doctor_ids) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            ids.contains(&a.appointment.doctor_id)
        }));
    }
    if !criteria.statuses.is_empty() {
        let statuses: HashSet<AppointmentStatus> = criteria.statuses.iter().copied().collect();
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            statuses.contains(&a.appointment.status)
        }));
    }

    if let Some(f) = Fragment::parse(criteria.patient_last_name.as_deref()) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            f.matches(&a.patient.last_name)
        }));
    }
    if let Some(f) = Fragment::parse(criteria.doctor_last_name.as_deref()) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            f.matches(&a.doctor.last_name)
        }));
    }
    if let Some(f) = Fragment::parse(criteria.doctor_specialization.as_deref()) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            f.matches(&a.doctor.specialization)
        }));
    }
    if let Some(f) = Fragment::parse(criteria.appointment_type.as_deref()) {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            f.matches_opt(a.appointment.appointment_type.as_deref())
        }));
    }

    if let Some(patients) = diagnosed {
        predicates.push(Box::new(move |a: &AppointmentDetails| {
            patients.contains(&a.appointment.patient_id)
        }));
    }

    predicates
}

fn id_set(ids: &[i64]) -> Option<HashSet<i64>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids.iter().copied().collect())
    }
}
