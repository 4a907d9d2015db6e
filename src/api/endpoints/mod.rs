//! API endpoint handlers.
//!
//! Each module corresponds to one clinic resource. Handlers check the
//! caller's permission, then hand a request-scoped connection to the
//! service layer on the blocking pool.

pub mod account;
pub mod appointments;
pub mod doctors;
pub mod health;
pub mod medical_records;
pub mod patients;
pub mod search;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Open a connection and run `work` on the blocking pool.
pub(crate) async fn with_db<T, F>(ctx: &ApiContext, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
{
    let core = ctx.core.clone();
    tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
        let conn = core.open_db()?;
        work(&conn)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core_state::CoreState;

    fn test_ctx() -> (ApiContext, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::initialize(tmp.path().join("klinika.db")).unwrap();
        (ApiContext::new(Arc::new(core)), tmp)
    }

    #[tokio::test]
    async fn with_db_runs_work_against_the_database() {
        let (ctx, _tmp) = test_ctx();
        let patients: i64 = with_db(&ctx, |conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?)
        })
        .await
        .unwrap();
        assert_eq!(patients, 0);
    }

    #[tokio::test]
    async fn with_db_passes_errors_through() {
        let (ctx, _tmp) = test_ctx();
        let err = with_db(&ctx, |_| Err::<(), _>(ApiError::NotFound("patient 9".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
