//! Order Status Deriver
//!
//! Recomputes the order status from item receiving state. Writes go through
//! the guarded status writer; only the transition table is bypassed.

use super::error::{OrderError, OrderResult};
use super::status_writer::{self, StatusChange};
use crate::db::begin_write;
use crate::db::repository::{item, order};
use serde::Serialize;
use shared::models::StatusChangeSource;
use shared::order::{ItemStatus, OrderStatus};
use sqlx::{Sqlite, SqlitePool, Transaction};

const REASON_ALL_RECEIVED: &str = "All items received";
const REASON_RECEIVING_INCOMPLETE: &str = "Receiving incomplete, status normalized";

/// Result of a recomputation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedStatus {
    pub order_id: i64,
    pub previous: String,
    /// Status after recomputation (raw value)
    pub status: String,
    pub changed: bool,
}

/// Target status for the current status and item statuses, `None` when nothing changes.
///
/// - CANCELADO is never touched.
/// - All items RECEBIDO (at least one item) ⇒ RECEBIDO, whatever the current status.
/// - Otherwise RECEBIDO / RECEBIMENTO fall back to CONFIRMADO.
pub fn derive_order_status(current: &str, item_statuses: &[String]) -> Option<OrderStatus> {
    let current = current.parse::<OrderStatus>().ok();
    if current == Some(OrderStatus::Cancelado) {
        return None;
    }

    let all_received = !item_statuses.is_empty()
        && item_statuses
            .iter()
            .all(|s| s.parse::<ItemStatus>() == Ok(ItemStatus::Recebido));

    let target = if all_received {
        OrderStatus::Recebido
    } else if matches!(current, Some(OrderStatus::Recebido | OrderStatus::Recebimento)) {
        OrderStatus::Confirmado
    } else {
        return None;
    };

    (current != Some(target)).then_some(target)
}

/// Recompute inside the caller's transaction
pub async fn recompute_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
) -> OrderResult<DerivedStatus> {
    let current = order::find_status(&mut **tx, order_id)
        .await?
        .ok_or(OrderError::OrderNotFound(order_id))?;
    let item_statuses = item::statuses_by_order(&mut **tx, order_id).await?;

    let Some(target) = derive_order_status(&current, &item_statuses) else {
        return Ok(DerivedStatus {
            order_id,
            previous: current.clone(),
            status: current,
            changed: false,
        });
    };

    let reason = if target == OrderStatus::Recebido {
        REASON_ALL_RECEIVED
    } else {
        REASON_RECEIVING_INCOMPLETE
    };

    status_writer::write_status(
        tx,
        StatusChange {
            order_id,
            expected: &current,
            target,
            note: Some(reason),
            actor: None,
            source: StatusChangeSource::Derived,
        },
    )
    .await?;

    tracing::info!(order_id, from = %current, to = %target, reason, "Order status derived");

    Ok(DerivedStatus {
        order_id,
        previous: current,
        status: target.as_str().to_string(),
        changed: true,
    })
}

/// Recompute the order status in its own transaction. Idempotent.
pub async fn recompute_order_status(pool: &SqlitePool, order_id: i64) -> OrderResult<DerivedStatus> {
    let mut tx = begin_write(pool).await?;
    let derived = recompute_in_tx(&mut tx, order_id).await?;
    tx.commit().await?;
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cancelled_is_never_changed() {
        assert_eq!(derive_order_status("CANCELADO", &items(&["RECEBIDO"])), None);
        assert_eq!(derive_order_status("CANCELADO", &items(&["PENDENTE"])), None);
    }

    #[test]
    fn test_all_received_sets_recebido() {
        for from in ["PENDENTE", "CONFIRMADO", "RECEBIMENTO"] {
            assert_eq!(
                derive_order_status(from, &items(&["RECEBIDO", "RECEBIDO"])),
                Some(OrderStatus::Recebido),
                "{from}"
            );
        }
        assert_eq!(derive_order_status("RECEBIDO", &items(&["RECEBIDO"])), None);
    }

    #[test]
    fn test_no_items_is_not_received() {
        assert_eq!(derive_order_status("CONFIRMADO", &[]), None);
        assert_eq!(derive_order_status("RECEBIDO", &[]), Some(OrderStatus::Confirmado));
    }

    #[test]
    fn test_incomplete_receiving_normalizes_down() {
        let partial = items(&["RECEBIDO", "PARCIAL"]);
        assert_eq!(derive_order_status("RECEBIDO", &partial), Some(OrderStatus::Confirmado));
        assert_eq!(derive_order_status("RECEBIMENTO", &partial), Some(OrderStatus::Confirmado));
        assert_eq!(derive_order_status("CONFIRMADO", &partial), None);
        assert_eq!(derive_order_status("PENDENTE", &partial), None);
    }

    #[test]
    fn test_all_received_overrides_downstream_and_unknown_statuses() {
        for from in ["EM_PREPARACAO", "ENVIADO", "ENTREGUE", "FATURADO", "ARQUIVADO"] {
            assert_eq!(
                derive_order_status(from, &items(&["RECEBIDO"])),
                Some(OrderStatus::Recebido),
                "{from}"
            );
        }
    }

    #[test]
    fn test_incomplete_receiving_keeps_downstream_statuses() {
        for from in ["EM_PREPARACAO", "ENVIADO", "ENTREGUE", "FATURADO", "ARQUIVADO"] {
            assert_eq!(derive_order_status(from, &items(&["PENDENTE"])), None, "{from}");
            assert_eq!(derive_order_status(from, &[]), None, "{from}");
        }
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let cases = [
            ("CONFIRMADO", items(&["RECEBIDO"])),
            ("RECEBIDO", items(&["PARCIAL"])),
            ("RECEBIMENTO", items(&["PENDENTE"])),
        ];
        for (from, statuses) in cases {
            let first = derive_order_status(from, &statuses).map(|s| s.as_str()).unwrap_or(from);
            assert_eq!(derive_order_status(first, &statuses), None);
        }
    }
}
