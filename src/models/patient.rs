use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub insurance_number: Option<String>,
    pub registration_date: NaiveDateTime,
}

impl Patient {
    pub fn full_name(&self) -> String {
        super::full_name(&self.last_name, &self.first_name, self.middle_name.as_deref())
    }
}

/// Patient form payload. Used for both create and full-replacement edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientInput {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub insurance_number: Option<String>,
    pub registration_date: Option<NaiveDateTime>,
}
