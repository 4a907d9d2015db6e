//! Accounts, passwords and sessions.

pub mod account;
pub mod password;
pub mod session;

pub use account::*;
pub use password::{hash_password, verify_password};
pub use session::{generate_token, hash_token, IssuedSession, Session, SessionStore};

use thiserror::Error;

use crate::db::DatabaseError;
use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("This email is already registered")]
    EmailTaken,

    /// Unknown email, inactive account and wrong password all map here.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Stored password hash is malformed")]
    MalformedHash,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
