//! Integrity Auditor
//!
//! Read-only inspection of orders: referential, calculation, domain and
//! receiving-consistency checks, scored per order and aggregated per system
//! run. Writes happen only in explicit auto-fix mode.

pub mod auditor;
pub mod autofix;
pub mod checks;
pub mod scoring;
pub mod system;

pub use auditor::IntegrityAuditor;

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for IntegrityError {
    fn from(err: sqlx::Error) -> Self {
        IntegrityError::Repo(err.into())
    }
}

impl IntegrityError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IntegrityError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            IntegrityError::Repo(RepoError::Database(_)) => ErrorCode::DatabaseError,
            IntegrityError::Repo(RepoError::Busy(_)) => ErrorCode::SystemBusy,
            IntegrityError::Repo(_) => ErrorCode::AuditFailed,
        }
    }
}

impl From<IntegrityError> for AppError {
    fn from(err: IntegrityError) -> Self {
        let code = err.code();
        tracing::error!(error = %err, error_code = ?code, "Integrity operation failed");
        let app = AppError::with_message(code, err.to_string());
        match err {
            IntegrityError::OrderNotFound(id) => app.with_detail("order_id", id),
            _ => app,
        }
    }
}

pub type IntegrityResult<T> = Result<T, IntegrityError>;
