//! Application state shared by every request.
//!
//! Holds the database location and the session store. Each request opens
//! its own SQLite connection through [`CoreState::open_db`]; no connection
//! is shared between requests.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::{self, AuthError, SessionStore};
use crate::config::AdminSeed;
use crate::db;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    db_path: PathBuf,
    sessions: RwLock<SessionStore>,
}

impl CoreState {
    /// Prepare the database file (create parent directory, run migrations)
    /// and return an empty-session state.
    pub fn initialize(db_path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        drop(db::open_database(&db_path)?);
        tracing::info!(path = %db_path.display(), "Database ready");
        Ok(Self {
            db_path,
            sessions: RwLock::new(SessionStore::new()),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a request-scoped connection.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_connection(&self.db_path).map_err(CoreError::Database)
    }

    // ── Sessions ────────────────────────────────────────────

    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionStore>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionStore>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }

    /// Create or promote the configured administrator.
    pub fn seed_admin(&self, seed: &AdminSeed) -> Result<(), CoreError> {
        let conn = self.open_db()?;
        let admin = auth::ensure_admin(&conn, &seed.email, &seed.password)?;
        // Sessions issued before a promotion carry the old role
        let revoked = self.write_sessions()?.revoke_user(admin.id);
        if revoked > 0 {
            tracing::debug!(user_id = admin.id, revoked, "Revoked stale sessions");
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Account error: {0}")]
    Account(#[from] AuthError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
