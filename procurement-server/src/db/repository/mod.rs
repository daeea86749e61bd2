//! Repository Module
//!
//! Free functions over SQLite. Single-statement functions take any
//! `SqliteExecutor` so they run against the pool or inside a transaction
//! (`&mut *tx` for an owned transaction, `&mut **tx` for a borrowed one).

// Orders
pub mod item;
pub mod order;
pub mod receiving;
pub mod status_history;
pub mod supplier_group;

// Reference data
pub mod reference;

// Collaborators
pub mod inventory_lot;
pub mod reservation;

// Integrity
pub mod audit_run;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    /// SQLite write lock held by another connection past `busy_timeout`
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if is_busy(&**db) => RepoError::Busy(err.to_string()),
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// SQLITE_BUSY (5) and its extended codes, e.g. BUSY_SNAPSHOT (517)
fn is_busy(err: &dyn sqlx::error::DatabaseError) -> bool {
    err.code()
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| code & 0xff == 5)
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_locked_database_maps_to_busy() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("busy.db").display());
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE t (v INTEGER)").execute(&pool).await.unwrap();

        let mut holder = pool.begin_with("BEGIN IMMEDIATE").await.unwrap();
        sqlx::query("INSERT INTO t (v) VALUES (1)")
            .execute(&mut *holder)
            .await
            .unwrap();

        let mut other = pool.acquire().await.unwrap();
        sqlx::query("PRAGMA busy_timeout = 0")
            .execute(&mut *other)
            .await
            .unwrap();
        let err = sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *other)
            .await
            .unwrap_err();
        assert!(matches!(RepoError::from(err), RepoError::Busy(_)));

        holder.rollback().await.unwrap();
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            RepoError::from(sqlx::Error::RowNotFound),
            RepoError::NotFound(_)
        ));
    }
}
