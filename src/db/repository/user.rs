use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, parse_enum, parse_opt_datetime};
use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::*;

const USER_COLUMNS: &str =
    "id, email, full_name, phone, password_hash, role, created_date, last_login_date, is_active";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        phone: row.get(3)?,
        password_hash: row.get(4)?,
        role: parse_enum(row, 5)?,
        created_date: parse_datetime(row, 6)?,
        last_login_date: parse_opt_datetime(row, 7)?,
        is_active: row.get::<_, i32>(8)? != 0,
    })
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO users (email, full_name, phone, password_hash, role, created_date,
         last_login_date, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.email,
            user.full_name,
            user.phone,
            user.password_hash,
            user.role.as_str(),
            format_datetime(&user.created_date),
            user.last_login_date.as_ref().map(format_datetime),
            user.is_active as i32,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    conn.query_row(&sql, params![id], user_from_row)
        .optional()
        .map_err(DatabaseError::from)
}

/// Look up by login email. Emails are stored lower-cased.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    conn.query_row(&sql, params![email], user_from_row)
        .optional()
        .map_err(DatabaseError::from)
}

pub fn record_login(conn: &Connection, id: i64, at: &NaiveDateTime) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE users SET last_login_date = ?2 WHERE id = ?1",
        params![id, format_datetime(at)],
    )?;
    Ok(())
}

pub fn set_user_role(conn: &Connection, id: i64, role: Role) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE users SET role = ?2 WHERE id = ?1",
        params![id, role.as_str()],
    )?;
    Ok(changed == 1)
}
