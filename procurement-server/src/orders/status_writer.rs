//! Guarded order status writer
//!
//! The only code path that changes `purchase_order.status`. Both the state
//! machine and the deriver go through here: compare-and-swap on the current
//! status plus a history row, inside the caller's transaction.

use super::error::{OrderError, OrderResult};
use crate::db::repository::{order, status_history};
use shared::models::StatusChangeSource;
use shared::order::OrderStatus;
use sqlx::{Sqlite, Transaction};

/// A status change to apply
#[derive(Debug, Clone)]
pub struct StatusChange<'a> {
    pub order_id: i64,
    /// Status the caller read; the write fails if it is no longer current
    pub expected: &'a str,
    pub target: OrderStatus,
    pub note: Option<&'a str>,
    pub actor: Option<&'a str>,
    pub source: StatusChangeSource,
}

/// Apply a status change inside `tx`.
///
/// Returns [`OrderError::StatusConflict`] when another writer changed the
/// status after the caller read it.
pub async fn write_status(
    tx: &mut Transaction<'_, Sqlite>,
    change: StatusChange<'_>,
) -> OrderResult<()> {
    let swapped = order::update_status(
        &mut **tx,
        change.order_id,
        change.expected,
        change.target.as_str(),
    )
    .await?;
    if !swapped {
        tracing::warn!(
            order_id = change.order_id,
            expected = %change.expected,
            target = %change.target,
            "Order status changed concurrently"
        );
        return Err(OrderError::StatusConflict(change.order_id));
    }

    status_history::insert(
        &mut **tx,
        status_history::HistoryInsert {
            order_id: change.order_id,
            from_status: Some(change.expected),
            to_status: change.target.as_str(),
            note: change.note,
            actor: change.actor,
            source: change.source,
        },
    )
    .await?;

    tracing::debug!(
        order_id = change.order_id,
        from = %change.expected,
        to = %change.target,
        source = change.source.as_str(),
        "Order status written"
    );
    Ok(())
}
