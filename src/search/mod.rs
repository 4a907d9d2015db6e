//! Appointment search: multi-criteria filter composition.
//!
//! Each supplied criterion becomes an independent predicate
//! ([`predicate::build_predicates`]); the predicates are ANDed over the
//! candidate set, the survivors ordered by appointment date-time
//! (most recent first) and capped at [`RESULT_CAP`] rows.
//!
//! The diagnosis criterion reaches through patient → medical records. It is
//! resolved once per search into a set of patient ids, then checked by
//! membership.
//!
//! Composition is pure: all I/O lives in [`fetch`].

pub mod fetch;
pub mod predicate;

use serde::{Deserialize, Serialize};

use crate::models::{AppointmentDetails, SearchCriteria};

pub use fetch::{load_candidates, run_search, CandidateSet};
pub use predicate::{end_of_day, start_of_day, Fragment};

/// Maximum rows returned by one search. Applied after ordering.
pub const RESULT_CAP: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub criteria: SearchCriteria,
    pub results: Vec<AppointmentDetails>,
    /// Number of rows in `results` (after the cap).
    pub total_results: usize,
}

/// Filter, order and cap `candidates` by `criteria`.
pub fn compose(criteria: SearchCriteria, candidates: &CandidateSet) -> SearchResults {
    let diagnosed = Fragment::parse(criteria.diagnosis.as_deref())
        .map(|f| predicate::patients_with_diagnosis(&candidates.diagnoses, &f));
    let predicates = predicate::build_predicates(&criteria, diagnosed);

    let mut results: Vec<AppointmentDetails> = candidates
        .appointments
        .iter()
        .filter(|appt| predicates.iter().all(|p| p(appt)))
        .cloned()
        .collect();

    results.sort_by(|a, b| {
        b.appointment
            .appointment_datetime
            .cmp(&a.appointment.appointment_datetime)
            .then_with(|| b.appointment.id.cmp(&a.appointment.id))
    });
    results.truncate(RESULT_CAP);

    SearchResults {
        total_results: results.len(),
        results,
        criteria,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime};

    use super::*;
    use crate::models::enums::AppointmentStatus;
    use crate::models::*;
    use crate::test_support::*;

    /// In-memory candidate builder: ids are assigned sequentially.
    struct Fixture {
        set: CandidateSet,
        next_id: i64,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                set: CandidateSet::default(),
                next_id: 1,
            }
        }

        fn add(
            &mut self,
            patient_id: i64,
            patient_last: &str,
            doctor_id: i64,
            doctor_last: &str,
            specialization: &str,
            at: NaiveDateTime,
        ) -> i64 {
            let id = self.next_id;
            self.next_id += 1;

            let mut p = patient(patient_last, &format!("+3805000{patient_id:05}"));
            p.id = patient_id;
            let mut d = doctor(doctor_last, specialization, true);
            d.id = doctor_id;
            let mut a = appointment(patient_id, doctor_id, at);
            a.id = id;

            self.set.appointments.push(AppointmentDetails {
                appointment: a,
                patient: p,
                doctor: d,
            });
            id
        }

        fn simple(&mut self, at: NaiveDateTime) -> i64 {
            self.add(1, "Бондар", 1, "Іваненко", "Кардіолог", at)
        }

        fn appointment_mut(&mut self, id: i64) -> &mut Appointment {
            &mut self
                .set
                .appointments
                .iter_mut()
                .find(|a| a.appointment.id == id)
                .unwrap()
                .appointment
        }

        fn diagnose(&mut self, patient_id: i64, diagnosis: &str) {
            self.set.diagnoses.push((patient_id, diagnosis.to_string()));
        }

        fn search(&self, criteria: SearchCriteria) -> SearchResults {
            compose(criteria, &self.set)
        }
    }

    fn ids(results: &SearchResults) -> Vec<i64> {
        results.results.iter().map(|a| a.appointment.id).collect()
    }

    #[test]
    fn empty_criteria_return_everything_most_recent_first() {
        let mut fx = Fixture::new();
        let jan = fx.simple(datetime(2025, 1, 10, 9, 0, 0));
        let mar = fx.simple(datetime(2025, 3, 10, 9, 0, 0));
        let feb = fx.simple(datetime(2025, 2, 10, 9, 0, 0));

        let results = fx.search(SearchCriteria::default());
        assert_eq!(ids(&results), vec![mar, feb, jan]);
        assert_eq!(results.total_results, 3);
    }

    #[test]
    fn criteria_are_echoed_back() {
        let fx = Fixture::new();
        let criteria = SearchCriteria {
            doctor_last_name: Some("Іван".into()),
            statuses: vec![AppointmentStatus::Confirmed],
            ..Default::default()
        };
        let results = fx.search(criteria.clone());
        assert_eq!(results.criteria, criteria);
    }

    #[test]
    fn date_to_covers_whole_day() {
        let mut fx = Fixture::new();
        let last_second = fx.simple(datetime(2025, 3, 9, 23, 59, 59));
        let morning = fx.simple(datetime(2025, 3, 9, 8, 0, 0));
        let next_midnight = fx.simple(datetime(2025, 3, 10, 0, 0, 0));

        let results = fx.search(SearchCriteria {
            date_to: Some(date(2025, 3, 9)),
            ..Default::default()
        });
        let found = ids(&results);
        assert!(found.contains(&last_second));
        assert!(found.contains(&morning));
        assert!(!found.contains(&next_midnight));
    }

    #[test]
    fn date_from_is_inclusive_from_midnight() {
        let mut fx = Fixture::new();
        let before = fx.simple(datetime(2025, 3, 8, 23, 59, 59));
        let midnight = fx.simple(datetime(2025, 3, 9, 0, 0, 0));

        let results = fx.search(SearchCriteria {
            date_from: Some(date(2025, 3, 9)),
            ..Default::default()
        });
        assert_eq!(ids(&results), vec![midnight]);
        assert!(!ids(&results).contains(&before));
    }

    #[test]
    fn date_range_bounds_hold_for_every_result() {
        let mut fx = Fixture::new();
        for day in 1..=28 {
            fx.simple(datetime(2025, 2, day, 10, 30, 0));
        }
        let from = date(2025, 2, 5);
        let to = date(2025, 2, 12);
        let results = fx.search(SearchCriteria {
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        });
        assert_eq!(results.total_results, 8);
        for a in &results.results {
            assert!(a.appointment.appointment_datetime >= start_of_day(from));
            assert!(a.appointment.appointment_datetime <= end_of_day(to));
        }
    }

    #[test]
    fn doctor_ids_filter_membership() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        let with_five = fx.add(1, "Бондар", 5, "Іваненко", "Кардіолог", at);
        fx.add(1, "Бондар", 6, "Петренко", "Терапевт", at);
        fx.add(2, "Мельник", 7, "Сидоренко", "Невролог", at);

        let results = fx.search(SearchCriteria {
            doctor_ids: vec![5],
            ..Default::default()
        });
        assert_eq!(ids(&results), vec![with_five]);
        assert!(results.results.iter().all(|a| a.appointment.doctor_id == 5));
    }

    #[test]
    fn empty_id_sets_do_not_filter() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        fx.add(1, "Бондар", 5, "Іваненко", "Кардіолог", at);
        fx.add(2, "Мельник", 6, "Петренко", "Терапевт", at);

        let omitted = fx.search(SearchCriteria::default());
        let empty = fx.search(SearchCriteria {
            doctor_ids: vec![],
            patient_ids: vec![],
            statuses: vec![],
            ..Default::default()
        });
        assert_eq!(ids(&omitted), ids(&empty));
        assert_eq!(empty.total_results, 2);
    }

    #[test]
    fn patient_ids_filter_membership() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        let a = fx.add(1, "Бондар", 5, "Іваненко", "Кардіолог", at);
        fx.add(2, "Мельник", 6, "Петренко", "Терапевт", at);
        let c = fx.add(3, "Шевчук", 7, "Сидоренко", "Невролог", at);

        let results = fx.search(SearchCriteria {
            patient_ids: vec![1, 3, 99],
            ..Default::default()
        });
        let mut found = ids(&results);
        found.sort();
        assert_eq!(found, vec![a, c]);
    }

    #[test]
    fn statuses_filter_membership() {
        let mut fx = Fixture::new();
        let done = fx.simple(datetime(2025, 5, 1, 9, 0, 0));
        let cancelled = fx.simple(datetime(2025, 5, 2, 9, 0, 0));
        fx.simple(datetime(2025, 5, 3, 9, 0, 0));
        fx.appointment_mut(done).status = AppointmentStatus::Completed;
        fx.appointment_mut(cancelled).status = AppointmentStatus::Cancelled;

        let results = fx.search(SearchCriteria {
            statuses: vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled],
            ..Default::default()
        });
        assert_eq!(ids(&results), vec![cancelled, done]);
    }

    #[test]
    fn specialization_fragment_is_case_insensitive() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        let cardio = fx.add(1, "Бондар", 1, "Іваненко", "Кардіолог", at);
        fx.add(1, "Бондар", 2, "Петренко", "Терапевт", at);

        let results = fx.search(SearchCriteria {
            doctor_specialization: Some("кард".into()),
            ..Default::default()
        });
        assert_eq!(ids(&results), vec![cardio]);
    }

    #[test]
    fn last_name_fragments_use_contains() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        let kovalenko = fx.add(1, "Коваленко", 1, "Іваненко", "Кардіолог", at);
        fx.add(2, "Мельник", 2, "Петренко", "Терапевт", at);

        let by_patient = fx.search(SearchCriteria {
            patient_last_name: Some("ВАЛЕН".into()),
            ..Default::default()
        });
        assert_eq!(ids(&by_patient), vec![kovalenko]);

        let by_doctor = fx.search(SearchCriteria {
            doctor_last_name: Some("ненко".into()),
            ..Default::default()
        });
        assert_eq!(ids(&by_doctor), vec![kovalenko]);
    }

    #[test]
    fn appointment_type_fragment_skips_missing_type() {
        let mut fx = Fixture::new();
        let consult = fx.simple(datetime(2025, 5, 1, 9, 0, 0));
        let untyped = fx.simple(datetime(2025, 5, 2, 9, 0, 0));
        fx.appointment_mut(consult).appointment_type = Some("Повторна консультація".into());
        fx.appointment_mut(untyped).appointment_type = None;

        let results = fx.search(SearchCriteria {
            appointment_type: Some("Консульт".into()),
            ..Default::default()
        });
        assert_eq!(ids(&results), vec![consult]);
    }

    #[test]
    fn whitespace_fragments_are_ignored() {
        let mut fx = Fixture::new();
        fx.simple(datetime(2025, 5, 1, 9, 0, 0));
        fx.simple(datetime(2025, 5, 2, 9, 0, 0));
        let results = fx.search(SearchCriteria {
            patient_last_name: Some("   ".into()),
            doctor_last_name: Some(String::new()),
            appointment_type: Some("\t".into()),
            diagnosis: Some(" ".into()),
            ..Default::default()
        });
        assert_eq!(results.total_results, 2);
    }

    #[test]
    fn diagnosis_is_a_patient_level_condition() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        let sick_a = fx.add(1, "Бондар", 1, "Іваненко", "Кардіолог", at);
        let sick_b = fx.add(1, "Бондар", 2, "Петренко", "Терапевт", at + Duration::hours(1));
        fx.add(2, "Мельник", 1, "Іваненко", "Кардіолог", at + Duration::hours(2));
        fx.diagnose(1, "Тестовий діагноз");
        fx.diagnose(2, "Гастрит");

        let results = fx.search(SearchCriteria {
            diagnosis: Some("діагноз".into()),
            ..Default::default()
        });
        assert_eq!(ids(&results), vec![sick_b, sick_a]);
    }

    #[test]
    fn diagnosis_without_matches_returns_nothing() {
        let mut fx = Fixture::new();
        fx.simple(datetime(2025, 5, 1, 9, 0, 0));
        fx.diagnose(1, "Гастрит");
        let results = fx.search(SearchCriteria {
            diagnosis: Some("грип".into()),
            ..Default::default()
        });
        assert_eq!(results.total_results, 0);
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        // Matches specialization only
        fx.add(1, "Бондар", 1, "Іваненко", "Кардіолог", at);
        // Matches patient name only
        fx.add(2, "Коваленко", 2, "Петренко", "Терапевт", at);
        // Matches both
        let both = fx.add(2, "Коваленко", 1, "Іваненко", "Кардіолог", at + Duration::hours(1));

        let results = fx.search(SearchCriteria {
            doctor_specialization: Some("кардіо".into()),
            patient_last_name: Some("коваль".into()),
            ..Default::default()
        });
        // "коваль" is not contained in "Коваленко"
        assert!(results.results.is_empty());

        let results = fx.search(SearchCriteria {
            doctor_specialization: Some("кардіо".into()),
            patient_last_name: Some("коваленко".into()),
            ..Default::default()
        });
        assert_eq!(ids(&results), vec![both]);
    }

    #[test]
    fn every_result_satisfies_every_criterion() {
        let mut fx = Fixture::new();
        let base = datetime(2025, 1, 1, 8, 0, 0);
        let specs = ["Кардіолог", "Терапевт", "Невролог"];
        let surnames = ["Бондар", "Коваленко", "Мельник", "Шевчук"];
        for i in 0..60i64 {
            let pid = i % 4 + 1;
            let did = i % 3 + 1;
            let id = fx.add(
                pid,
                surnames[(pid - 1) as usize],
                did,
                "Іваненко",
                specs[(did - 1) as usize],
                base + Duration::hours(i * 13),
            );
            if i % 5 == 0 {
                fx.appointment_mut(id).status = AppointmentStatus::Completed;
            }
        }
        fx.diagnose(2, "Хронічний гастрит");
        fx.diagnose(3, "Гастрит");

        let criteria = SearchCriteria {
            date_from: Some(date(2025, 1, 3)),
            date_to: Some(date(2025, 1, 25)),
            doctor_ids: vec![1, 2],
            diagnosis: Some("ГАСТРИТ".into()),
            ..Default::default()
        };
        let results = fx.search(criteria);
        assert!(!results.results.is_empty());
        for a in &results.results {
            let at = a.appointment.appointment_datetime;
            assert!(at >= start_of_day(date(2025, 1, 3)));
            assert!(at <= end_of_day(date(2025, 1, 25)));
            assert!([1, 2].contains(&a.appointment.doctor_id));
            assert!([2, 3].contains(&a.appointment.patient_id));
        }
        // Ordered most recent first
        assert!(results
            .results
            .windows(2)
            .all(|w| w[0].appointment.appointment_datetime >= w[1].appointment.appointment_datetime));
    }

    #[test]
    fn result_is_capped_to_most_recent_hundred() {
        let mut fx = Fixture::new();
        let base = datetime(2025, 1, 1, 9, 0, 0);
        for i in 0..150 {
            fx.simple(base + Duration::hours(i));
        }

        let results = fx.search(SearchCriteria::default());
        assert_eq!(results.results.len(), RESULT_CAP);
        assert_eq!(results.total_results, 100);

        // Newest is hour 149, oldest kept is hour 50
        assert_eq!(
            results.results.first().unwrap().appointment.appointment_datetime,
            base + Duration::hours(149)
        );
        assert_eq!(
            results.results.last().unwrap().appointment.appointment_datetime,
            base + Duration::hours(50)
        );
        let cutoff = base + Duration::hours(50);
        assert!(results
            .results
            .iter()
            .all(|a| a.appointment.appointment_datetime >= cutoff));
    }

    #[test]
    fn cap_applies_after_filtering() {
        let mut fx = Fixture::new();
        let base = datetime(2025, 1, 1, 9, 0, 0);
        for i in 0..150 {
            let id = fx.simple(base + Duration::hours(i));
            if i % 2 == 0 {
                fx.appointment_mut(id).status = AppointmentStatus::Confirmed;
            }
        }
        let results = fx.search(SearchCriteria {
            statuses: vec![AppointmentStatus::Confirmed],
            ..Default::default()
        });
        assert_eq!(results.total_results, 75);
    }

    #[test]
    fn equal_datetimes_order_by_id_descending() {
        let mut fx = Fixture::new();
        let at = datetime(2025, 5, 1, 9, 0, 0);
        let first = fx.add(1, "Бондар", 1, "Іваненко", "Кардіолог", at);
        let second = fx.add(2, "Мельник", 2, "Петренко", "Терапевт", at);
        let results = fx.search(SearchCriteria::default());
        assert_eq!(ids(&results), vec![second, first]);
    }

    #[test]
    fn composition_does_not_mutate_candidates() {
        let mut fx = Fixture::new();
        fx.simple(datetime(2025, 5, 1, 9, 0, 0));
        fx.simple(datetime(2025, 4, 1, 9, 0, 0));
        let before = fx.set.appointments.clone();
        let _ = fx.search(SearchCriteria {
            date_to: Some(date(2025, 4, 30)),
            ..Default::default()
        });
        assert_eq!(fx.set.appointments, before);
    }
}
