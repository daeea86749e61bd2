//! Order lifecycle errors

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use shared::order::OrderStatus;
use thiserror::Error;

/// Errors surfaced by the state machine, the receiving accumulator and the deriver.
///
/// Every variant aborts the operation without partial state change.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: OrderStatus },

    #[error("Invalid quantity: {0} (must be greater than zero)")]
    InvalidQuantity(f64),

    #[error(
        "Receipt of {quantity} exceeds ordered quantity {ordered} (already received {received})"
    )]
    ExceedsOrdered {
        ordered: f64,
        received: f64,
        quantity: f64,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Order {0} status was changed concurrently")]
    StatusConflict(i64),

    #[error("Receiving record of item {0} kept changing, giving up")]
    ReceiptConflict(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Repo(err.into())
    }
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            OrderError::ItemNotFound(_) => ErrorCode::OrderItemNotFound,
            OrderError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            OrderError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            OrderError::ExceedsOrdered { .. } => ErrorCode::ExceedsOrdered,
            OrderError::Validation(_) => ErrorCode::ValidationFailed,
            OrderError::StatusConflict(_) => ErrorCode::StatusConflict,
            OrderError::ReceiptConflict(_) => ErrorCode::ReceiptConflict,
            OrderError::Repo(RepoError::NotFound(_)) => ErrorCode::NotFound,
            OrderError::Repo(RepoError::Duplicate(_)) => ErrorCode::AlreadyExists,
            OrderError::Repo(RepoError::Validation(_)) => ErrorCode::ValidationFailed,
            OrderError::Repo(RepoError::Database(_)) => ErrorCode::DatabaseError,
            OrderError::Repo(RepoError::Busy(_)) => ErrorCode::SystemBusy,
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let code = err.code();
        if matches!(err, OrderError::Repo(RepoError::Database(_))) {
            // 保留技术细节用于日志
            tracing::error!(error = %err, error_code = ?code, "Storage error occurred");
        }
        let app = AppError::with_message(code, err.to_string());
        match err {
            OrderError::OrderNotFound(id) => app.with_detail("order_id", id),
            OrderError::ItemNotFound(id) | OrderError::ReceiptConflict(id) => {
                app.with_detail("order_item_id", id)
            }
            OrderError::StatusConflict(id) => app.with_detail("order_id", id),
            OrderError::InvalidTransition { from, to } => app
                .with_detail("from", from)
                .with_detail("to", to.as_str()),
            OrderError::ExceedsOrdered {
                ordered,
                received,
                quantity,
            } => app
                .with_detail("ordered", ordered)
                .with_detail("received", received)
                .with_detail("quantity", quantity),
            _ => app,
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(OrderError::OrderNotFound(1).code(), ErrorCode::OrderNotFound);
        assert_eq!(OrderError::ItemNotFound(1).code(), ErrorCode::OrderItemNotFound);
        assert_eq!(OrderError::InvalidQuantity(0.0).code(), ErrorCode::InvalidQuantity);
        assert_eq!(
            OrderError::Validation("x".into()).code(),
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            OrderError::Repo(RepoError::Database("x".into())).code(),
            ErrorCode::DatabaseError
        );
        assert_eq!(
            OrderError::Repo(RepoError::Busy("database is locked".into())).code(),
            ErrorCode::SystemBusy
        );
    }

    #[test]
    fn test_into_app_error_keeps_details() {
        let err = OrderError::ExceedsOrdered {
            ordered: 10.0,
            received: 6.0,
            quantity: 5.0,
        };
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ExceedsOrdered);
        let details = app.details.unwrap();
        assert_eq!(details["ordered"], 10.0);
        assert_eq!(details["received"], 6.0);
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = OrderError::InvalidTransition {
            from: "PENDENTE".into(),
            to: OrderStatus::Entregue,
        };
        assert_eq!(err.to_string(), "Invalid transition: PENDENTE -> ENTREGUE");
    }
}
