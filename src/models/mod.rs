pub mod enums;
pub mod filters;

mod appointment;
mod doctor;
mod medical_record;
mod patient;
mod user;

pub use appointment::*;
pub use doctor::*;
pub use filters::*;
pub use medical_record::*;
pub use patient::*;
pub use user::*;

/// Display name in clinic order: last, first, middle.
pub fn full_name(last_name: &str, first_name: &str, middle_name: Option<&str>) -> String {
    format!("{last_name} {first_name} {}", middle_name.unwrap_or(""))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_orders_last_first_middle() {
        assert_eq!(
            full_name("Шевченко", "Тарас", Some("Григорович")),
            "Шевченко Тарас Григорович"
        );
    }

    #[test]
    fn full_name_without_middle_is_trimmed() {
        assert_eq!(full_name("Koval", "Olena", None), "Koval Olena");
    }
}
