use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: i32,
    pub phone_number: String,
    pub email: Option<String>,
    pub office_number: Option<String>,
    pub working_hours: Option<String>,
    pub hire_date: NaiveDate,
    pub is_active: bool,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        super::full_name(&self.last_name, &self.first_name, self.middle_name.as_deref())
    }

    /// Full name followed by specialization, as shown in scheduling forms.
    pub fn full_name_with_title(&self) -> String {
        format!("{}, {}", self.full_name(), self.specialization)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorInput {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: i32,
    pub phone_number: String,
    pub email: Option<String>,
    pub office_number: Option<String>,
    pub working_hours: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl Default for DoctorInput {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            middle_name: None,
            specialization: String::new(),
            qualification: String::new(),
            experience_years: 0,
            phone_number: String::new(),
            email: None,
            office_number: None,
            working_hours: None,
            hire_date: None,
            is_active: true,
        }
    }
}
