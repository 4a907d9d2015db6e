pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Unique constraint violated on {table}({})", columns.join(", "))]
    UniqueViolation { table: String, columns: Vec<String> },

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

const FOREIGN_KEY_FAILED: &str = "FOREIGN KEY constraint failed";

impl DatabaseError {
    /// Classify an error raised by an INSERT/UPDATE/DELETE so that
    /// uniqueness and foreign-key failures can be told apart from
    /// generic SQLite failures.
    pub fn from_write(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, msg) = &err {
            match code.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    if let Some((table, columns)) =
                        msg.as_deref().and_then(parse_unique_message)
                    {
                        return Self::UniqueViolation { table, columns };
                    }
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Self::ForeignKeyViolation(
                        msg.clone().unwrap_or_else(|| FOREIGN_KEY_FAILED.into()),
                    );
                }
                // ON DELETE RESTRICT is enforced as a trigger.
                rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER
                    if msg.as_deref() == Some(FOREIGN_KEY_FAILED) =>
                {
                    return Self::ForeignKeyViolation(FOREIGN_KEY_FAILED.into());
                }
                _ => {}
            }
        }
        Self::Sqlite(err)
    }

    /// True when this is a uniqueness violation on exactly `table(columns)`.
    pub fn is_unique_violation(&self, table: &str, columns: &[&str]) -> bool {
        match self {
            Self::UniqueViolation { table: t, columns: c } => {
                t == table && c.len() == columns.len() && c.iter().zip(columns).all(|(a, b)| a == b)
            }
            _ => false,
        }
    }
}

/// Parse "UNIQUE constraint failed: appointments.doctor_id, appointments.appointment_datetime".
fn parse_unique_message(msg: &str) -> Option<(String, Vec<String>)> {
    let rest = msg.strip_prefix("UNIQUE constraint failed: ")?;
    let mut table = None;
    let mut columns = Vec::new();
    for qualified in rest.split(", ") {
        let (t, c) = qualified.trim().split_once('.')?;
        table.get_or_insert_with(|| t.to_string());
        columns.push(c.to_string());
    }
    Some((table?, columns))
}
