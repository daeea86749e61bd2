//! Per-order audit

use super::checks::{self, OrderAggregate, ReferenceSnapshot};
use super::scoring;
use super::{IntegrityError, IntegrityResult};
use crate::db::repository::{item, order, receiving, reference, supplier_group};
use shared::models::{IntegrityReport, IssueCounts};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{BTreeSet, HashMap};

/// Load an order with its groups, items, receipts and reference state
pub(crate) async fn load_aggregate(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> IntegrityResult<OrderAggregate> {
    let order = order::find_by_id(&mut *conn, order_id)
        .await?
        .ok_or(IntegrityError::OrderNotFound(order_id))?;
    let groups = supplier_group::find_by_order(&mut *conn, order_id).await?;
    let items = item::find_by_order(&mut *conn, order_id).await?;
    let received = receiving::find_by_order(&mut *conn, order_id)
        .await?
        .into_iter()
        .map(|r| (r.order_item_id, r.quantity_received))
        .collect();

    let mut refs = ReferenceSnapshot {
        user_exists: match order.user_id {
            Some(user_id) => reference::user_exists(&mut *conn, user_id).await?,
            None => false,
        },
        ..Default::default()
    };

    let supplier_ids: BTreeSet<i64> = groups.iter().map(|g| g.supplier_id).collect();
    for id in supplier_ids {
        if !reference::supplier_exists(&mut *conn, id).await? {
            refs.missing_suppliers.insert(id);
        }
    }

    let product_ids: BTreeSet<i64> = items.iter().map(|i| i.product_id).collect();
    for id in product_ids {
        if !reference::product_exists(&mut *conn, id).await? {
            refs.missing_products.insert(id);
        }
    }

    let contract_ids: BTreeSet<i64> = items.iter().filter_map(|i| i.contract_id).collect();
    let mut contracts = HashMap::new();
    for id in contract_ids {
        if let Some(active) = reference::contract_active(&mut *conn, id).await? {
            contracts.insert(id, active);
        }
    }
    refs.contracts = contracts;

    Ok(OrderAggregate {
        order,
        groups,
        items,
        received,
        refs,
    })
}

/// Score, count and recommend over an aggregate's issues
pub(crate) fn build_report(agg: &OrderAggregate) -> IntegrityReport {
    let issues = checks::run_checks(agg);
    IntegrityReport {
        order_id: agg.order.id,
        order_number: agg.order.order_number.clone(),
        status: agg.order.status.clone(),
        score: scoring::score(&issues),
        recommendations: scoring::recommendations(&issues),
        counts: IssueCounts::from_issues(&issues),
        issues,
        audited_at: shared::util::now_millis(),
    }
}

/// Integrity auditor
#[derive(Clone)]
pub struct IntegrityAuditor {
    pool: SqlitePool,
}

impl IntegrityAuditor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Audit one order. Read-only.
    pub async fn audit_order(&self, order_id: i64) -> IntegrityResult<IntegrityReport> {
        let mut conn = self.pool.acquire().await?;
        let agg = load_aggregate(&mut conn, order_id).await?;
        drop(conn);

        let report = build_report(&agg);
        tracing::debug!(
            order_id,
            score = report.score,
            critical = report.counts.critical,
            warning = report.counts.warning,
            "Order audited"
        );
        Ok(report)
    }
}
