//! Option lists for selection controls.
//!
//! Each call returns its own lists; nothing is cached between requests.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::{self, DatabaseError};
use crate::models::enums::AppointmentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub value: AppointmentStatus,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionLists {
    pub patients: Vec<SelectOption>,
    pub doctors: Vec<SelectOption>,
    pub statuses: Vec<StatusOption>,
}

fn statuses() -> Vec<StatusOption> {
    AppointmentStatus::ALL
        .iter()
        .map(|&value| StatusOption {
            value,
            label: value.label(),
        })
        .collect()
}

fn patient_options(conn: &Connection) -> Result<Vec<SelectOption>, DatabaseError> {
    Ok(db::list_patients(conn)?
        .into_iter()
        .map(|p| SelectOption {
            label: p.full_name(),
            id: p.id,
        })
        .collect())
}

/// Search form: patients and active doctors by last name, labelled with
/// full names.
pub fn search_options(conn: &Connection) -> Result<OptionLists, DatabaseError> {
    let doctors = db::list_active_doctors(conn)?
        .into_iter()
        .map(|d| SelectOption {
            label: d.full_name(),
            id: d.id,
        })
        .collect();
    Ok(OptionLists {
        patients: patient_options(conn)?,
        doctors,
        statuses: statuses(),
    })
}

/// Booking form: active doctors are labelled with their specialization.
pub fn appointment_form_options(conn: &Connection) -> Result<OptionLists, DatabaseError> {
    let doctors = db::list_active_doctors(conn)?
        .into_iter()
        .map(|d| SelectOption {
            label: d.full_name_with_title(),
            id: d.id,
        })
        .collect();
    Ok(OptionLists {
        patients: patient_options(conn)?,
        doctors,
        statuses: statuses(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_doctor, insert_patient, open_memory_database};
    use crate::test_support::*;

    fn seeded() -> Connection {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &patient("Шевчук", "+380501112201")).unwrap();
        insert_patient(&conn, &patient("Бондар", "+380501112202")).unwrap();
        insert_doctor(&conn, &doctor("Петренко", "Терапевт", true)).unwrap();
        insert_doctor(&conn, &doctor("Іваненко", "Кардіолог", true)).unwrap();
        insert_doctor(&conn, &doctor("Сидоренко", "Невролог", false)).unwrap();
        conn
    }

    #[test]
    fn search_options_list_active_doctors_by_full_name() {
        let conn = seeded();
        let options = search_options(&conn).unwrap();

        let patients: Vec<&str> = options.patients.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(patients, vec!["Бондар Олена Петрівна", "Шевчук Олена Петрівна"]);

        let doctors: Vec<&str> = options.doctors.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(doctors, vec!["Іваненко Андрій", "Петренко Андрій"]);
    }

    #[test]
    fn form_options_label_doctors_with_specialization() {
        let conn = seeded();
        let options = appointment_form_options(&conn).unwrap();
        let doctors: Vec<&str> = options.doctors.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(doctors, vec!["Іваненко Андрій, Кардіолог", "Петренко Андрій, Терапевт"]);
    }

    #[test]
    fn statuses_cover_every_variant() {
        let conn = open_memory_database().unwrap();
        let options = search_options(&conn).unwrap();
        assert_eq!(options.statuses.len(), AppointmentStatus::ALL.len());
        assert_eq!(options.statuses[0].value, AppointmentStatus::Scheduled);
        assert!(options.patients.is_empty());
    }
}
