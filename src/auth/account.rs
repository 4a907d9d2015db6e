//! Registration, login and admin seeding.

use rusqlite::Connection;
use serde::Deserialize;
use zeroize::Zeroize;

use super::password::{hash_password, verify_password};
use super::AuthError;
use crate::clinic::now;
use crate::db::{self, DatabaseError};
use crate::models::enums::Role;
use crate::models::{full_name, User};
use crate::validation::{
    normalize_opt, validate_registration, RegistrationFields, ValidationErrors,
};

// Defaults are per field; the container form cannot build a `Drop` type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl Drop for RegisterRequest {
    fn drop(&mut self) {
        self.password.zeroize();
        self.confirm_password.zeroize();
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl Drop for LoginRequest {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create a `user` account. The caller issues the session.
pub fn register(conn: &Connection, request: &RegisterRequest) -> Result<User, AuthError> {
    validate_registration(&RegistrationFields {
        last_name: &request.last_name,
        first_name: &request.first_name,
        email: &request.email,
        phone: &request.phone,
        password: &request.password,
        confirm_password: &request.confirm_password,
    })
    .into_result()?;

    let email = normalize_email(&request.email);
    if db::get_user_by_email(conn, &email)?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let middle = normalize_opt(request.middle_name.clone());
    let mut user = User {
        id: 0,
        email,
        full_name: full_name(
            request.last_name.trim(),
            request.first_name.trim(),
            middle.as_deref(),
        ),
        phone: request.phone.trim().to_string(),
        password_hash: hash_password(&request.password),
        role: Role::User,
        created_date: now(),
        last_login_date: None,
        is_active: true,
    };
    user.id = db::insert_user(conn, &user).map_err(|e| match e {
        e if e.is_unique_violation("users", &["email"]) => AuthError::EmailTaken,
        other => AuthError::Database(other),
    })?;
    tracing::info!(user_id = user.id, "Account registered");
    Ok(user)
}

/// Check credentials and stamp the login time.
pub fn authenticate(conn: &Connection, email: &str, password: &str) -> Result<User, AuthError> {
    let Some(mut user) = db::get_user_by_email(conn, &normalize_email(email))? else {
        tracing::debug!("Login for unknown email");
        return Err(AuthError::InvalidCredentials);
    };
    if !user.is_active {
        tracing::warn!(user_id = user.id, "Login attempt on inactive account");
        return Err(AuthError::InvalidCredentials);
    }
    if !verify_password(password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let at = now();
    db::record_login(conn, user.id, &at)?;
    user.last_login_date = Some(at);
    tracing::info!(user_id = user.id, "Login succeeded");
    Ok(user)
}

/// Make sure `email` is an administrator.
///
/// An existing account is promoted without touching its password; a missing
/// one is created with `password`.
pub fn ensure_admin(conn: &Connection, email: &str, password: &str) -> Result<User, AuthError> {
    let email = normalize_email(email);
    if let Some(mut user) = db::get_user_by_email(conn, &email)? {
        if user.role != Role::Admin {
            db::set_user_role(conn, user.id, Role::Admin)?;
            user.role = Role::Admin;
            tracing::info!(user_id = user.id, "Account promoted to admin");
        }
        return Ok(user);
    }

    if password.is_empty() {
        return Err(ValidationErrors::single("password", "Password is required").into());
    }
    let mut user = User {
        id: 0,
        full_name: email.clone(),
        email,
        phone: String::new(),
        password_hash: hash_password(password),
        role: Role::Admin,
        created_date: now(),
        last_login_date: None,
        is_active: true,
    };
    user.id = db::insert_user(conn, &user)?;
    tracing::info!(user_id = user.id, "Admin account seeded");
    Ok(user)
}

pub fn get_account(conn: &Connection, id: i64) -> Result<User, AuthError> {
    db::get_user(conn, id)?.ok_or_else(|| {
        AuthError::Database(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: id.to_string(),
        })
    })
}
