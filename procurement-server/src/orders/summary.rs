//! Receiving progress of an order

use super::error::{OrderError, OrderResult};
use super::money::{quantity_to_f64, to_decimal, to_f64};
use crate::db::repository::{item, order, receiving, supplier_group};
use rust_decimal::Decimal;
use shared::models::{ItemReceivingLine, ReceivingSummary};
use sqlx::SqlitePool;
use std::collections::HashMap;

fn percent(part: Decimal, whole: Decimal) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    to_f64(part * Decimal::ONE_HUNDRED / whole)
}

/// Per-item ordered / received / pending quantities plus order totals
pub async fn receiving_summary(pool: &SqlitePool, order_id: i64) -> OrderResult<ReceivingSummary> {
    let order = order::find_by_id(pool, order_id)
        .await?
        .ok_or(OrderError::OrderNotFound(order_id))?;
    let suppliers: HashMap<i64, i64> = supplier_group::find_by_order(pool, order_id)
        .await?
        .into_iter()
        .map(|g| (g.id, g.supplier_id))
        .collect();
    let items = item::find_by_order(pool, order_id).await?;
    let records: HashMap<i64, _> = receiving::find_by_order(pool, order_id)
        .await?
        .into_iter()
        .map(|r| (r.order_item_id, r))
        .collect();

    let mut total_ordered = Decimal::ZERO;
    let mut total_received = Decimal::ZERO;
    let mut lines = Vec::with_capacity(items.len());

    for it in &items {
        let record = records.get(&it.id);
        let ordered = to_decimal(it.quantity);
        let received = to_decimal(record.map(|r| r.quantity_received).unwrap_or(0.0));
        let pending = (ordered - received).max(Decimal::ZERO);

        total_ordered += ordered;
        total_received += received.min(ordered);

        lines.push(ItemReceivingLine {
            order_item_id: it.id,
            order_supplier_id: it.order_supplier_id,
            supplier_id: suppliers.get(&it.order_supplier_id).copied().unwrap_or_default(),
            product_id: it.product_id,
            quantity_ordered: it.quantity,
            quantity_received: quantity_to_f64(received),
            quantity_pending: quantity_to_f64(pending),
            percent_received: percent(received, ordered),
            status: it.status.clone(),
            lot: record.and_then(|r| r.lot.clone()),
            last_received_at: record.and_then(|r| r.last_received_at),
        });
    }

    let fully_received = !lines.is_empty()
        && lines
            .iter()
            .all(|l| to_decimal(l.quantity_received) >= to_decimal(l.quantity_ordered));

    Ok(ReceivingSummary {
        order_id: order.id,
        order_number: order.order_number,
        order_status: order.status,
        items: lines,
        total_ordered: quantity_to_f64(total_ordered),
        total_received: quantity_to_f64(total_received),
        completion_percent: percent(total_received, total_ordered),
        fully_received,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(to_decimal(4.0), to_decimal(10.0)), 40.0);
        assert_eq!(percent(to_decimal(1.0), to_decimal(3.0)), 33.33);
        assert_eq!(percent(to_decimal(5.0), Decimal::ZERO), 0.0);
    }
}
