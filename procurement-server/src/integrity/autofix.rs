//! Automatic correction
//!
//! Only two issue shapes are corrected, each addressed by code and target
//! id: an item subtotal is rewritten to quantity × unit price, an order
//! total to the sum of computed item subtotals. Everything else is left for
//! a human and returned as unresolved.

use super::auditor::{IntegrityAuditor, load_aggregate};
use super::checks::{self, OrderAggregate};
use super::IntegrityResult;
use crate::audit_log;
use crate::db::begin_write;
use crate::db::repository::{item, order};
use crate::orders::money::{line_subtotal, to_f64};
use shared::models::{AutoFixResult, IntegrityIssue, IssueCode, IssueTarget};
use sqlx::SqliteConnection;

/// A correction the fixer knows how to apply
#[derive(Debug, Clone, Copy, PartialEq)]
enum Fix {
    ItemSubtotal { item_id: i64, subtotal: f64 },
    OrderTotal { order_id: i64, total: f64 },
}

impl Fix {
    fn describe(&self) -> String {
        match self {
            Fix::ItemSubtotal { item_id, subtotal } => {
                format!("item {item_id}: subtotal set to {subtotal:.2}")
            }
            Fix::OrderTotal { order_id, total } => {
                format!("order {order_id}: total_value set to {total:.2}")
            }
        }
    }
}

/// Map an issue to a fix, `None` when it has to stay unresolved.
///
/// Rows with non-positive quantity or price are never recomputed.
fn plan_fix(agg: &OrderAggregate, issue: &IntegrityIssue) -> Option<Fix> {
    match (issue.code, issue.target) {
        (IssueCode::ItemSubtotalMismatch, IssueTarget::Item(item_id)) => {
            let it = agg.items.iter().find(|i| i.id == item_id)?;
            if it.quantity <= 0.0 || it.unit_price <= 0.0 {
                return None;
            }
            Some(Fix::ItemSubtotal {
                item_id,
                subtotal: to_f64(line_subtotal(it.quantity, it.unit_price)),
            })
        }
        (IssueCode::OrderTotalMismatch, IssueTarget::Order(order_id)) => {
            if agg.has_non_positive_inputs() {
                return None;
            }
            Some(Fix::OrderTotal {
                order_id,
                total: to_f64(agg.computed_total()),
            })
        }
        _ => None,
    }
}

async fn apply(conn: &mut SqliteConnection, fix: Fix) -> IntegrityResult<()> {
    match fix {
        Fix::ItemSubtotal { item_id, subtotal } => {
            item::update_subtotal(&mut *conn, item_id, subtotal).await?
        }
        Fix::OrderTotal { order_id, total } => order::update_total(&mut *conn, order_id, total).await?,
    }
    Ok(())
}

impl IntegrityAuditor {
    /// Correct the deterministic calculation issues of one order in a single transaction.
    pub async fn auto_fix(&self, order_id: i64, actor: &str) -> IntegrityResult<AutoFixResult> {
        let mut tx = begin_write(self.pool()).await?;
        let agg = load_aggregate(&mut tx, order_id).await?;
        let issues = checks::run_checks(&agg);

        let mut fixed = 0usize;
        let mut unresolved = Vec::new();
        let mut log = Vec::new();

        for issue in issues {
            if !issue.code.is_auto_fixable() {
                unresolved.push(issue);
                continue;
            }
            let Some(fix) = plan_fix(&agg, &issue) else {
                log.push(format!(
                    "skipped {:?} on {:?}: non-positive quantity or unit price",
                    issue.code, issue.target
                ));
                unresolved.push(issue);
                continue;
            };
            apply(&mut tx, fix).await?;
            log.push(match issue.observed.as_deref() {
                Some(old) => format!("{} (was {old})", fix.describe()),
                None => fix.describe(),
            });
            fixed += 1;
        }

        tx.commit().await?;

        if fixed > 0 {
            tracing::info!(order_id, fixed, unresolved = unresolved.len(), "Auto-fix applied");
            audit_log!(actor, "integrity_auto_fix", format!("order:{order_id}"), log.join("; "));
        }

        Ok(AutoFixResult {
            order_id,
            fixed,
            unresolved,
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::checks::ReferenceSnapshot;
    use shared::models::{OrderItem, OrderSupplierGroup, PurchaseOrder};
    use std::collections::HashMap;

    fn aggregate(q: f64, p: f64, subtotal: f64, total: f64) -> OrderAggregate {
        OrderAggregate {
            order: PurchaseOrder {
                id: 1,
                order_number: "PED-1".into(),
                status: "PENDENTE".into(),
                total_value: total,
                notes: None,
                user_id: Some(1),
                created_at: 0,
                updated_at: 0,
            },
            groups: vec![OrderSupplierGroup {
                id: 1,
                order_id: 1,
                supplier_id: 1,
                subtotal: 20.0,
                status: "PENDENTE".into(),
                created_at: 0,
                updated_at: 0,
            }],
            items: vec![OrderItem {
                id: 5,
                order_supplier_id: 1,
                product_id: 1,
                contract_id: None,
                quantity: q,
                unit_price: p,
                subtotal,
                status: "PENDENTE".into(),
                created_at: 0,
                updated_at: 0,
            }],
            received: HashMap::new(),
            refs: ReferenceSnapshot {
                user_exists: true,
                ..Default::default()
            },
        }
    }

    fn fixes(agg: &OrderAggregate) -> Vec<Option<Fix>> {
        checks::run_checks(agg)
            .iter()
            .filter(|i| i.code.is_auto_fixable())
            .map(|i| plan_fix(agg, i))
            .collect()
    }

    #[test]
    fn test_item_subtotal_fix_targets_item() {
        let agg = aggregate(10.0, 2.0, 25.0, 20.0);
        assert_eq!(
            fixes(&agg),
            vec![Some(Fix::ItemSubtotal {
                item_id: 5,
                subtotal: 20.0
            })]
        );
    }

    #[test]
    fn test_order_total_fix() {
        let agg = aggregate(10.0, 2.0, 20.0, 99.0);
        assert_eq!(
            fixes(&agg),
            vec![Some(Fix::OrderTotal {
                order_id: 1,
                total: 20.0
            })]
        );
    }

    #[test]
    fn test_non_positive_inputs_are_not_fixed() {
        let agg = aggregate(0.0, 2.0, 5.0, 5.0);
        assert!(fixes(&agg).iter().all(Option::is_none));
    }

    #[test]
    fn test_describe() {
        let fix = Fix::OrderTotal {
            order_id: 3,
            total: 20.0,
        };
        assert_eq!(fix.describe(), "order 3: total_value set to 20.00");
    }
}
