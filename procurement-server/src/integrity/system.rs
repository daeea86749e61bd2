//! System-wide audit
//!
//! Audits every order independently: one order failing to load becomes a
//! CRITICAL issue scoped to it and the scan goes on. Orphan scans cover rows
//! a per-order audit cannot reach.

use super::auditor::IntegrityAuditor;
use super::IntegrityResult;
use crate::audit_log;
use crate::db::repository::{audit_run, order, reference};
use crate::orders::money::to_f64;
use rust_decimal::Decimal;
use shared::models::{
    AuditRun, IntegrityIssue, IssueCategory, IssueCode, IssueCounts, IssueTarget, Severity,
    SystemIntegrityReport,
};

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn orphan_issue(code: IssueCode, what: &str, ids: &[i64], suggestion: &str) -> IntegrityIssue {
    IntegrityIssue::new(
        Severity::Critical,
        IssueCategory::Reference,
        code,
        IssueTarget::System,
        format!("{} {what}", ids.len()),
    )
    .with_observed(join_ids(ids))
    .with_suggestion(suggestion)
}

fn average(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 100.0;
    }
    let sum: Decimal = scores.iter().map(|s| Decimal::from(*s)).sum();
    to_f64(sum / Decimal::from(scores.len()))
}

impl IntegrityAuditor {
    /// Structural orphan scans over the whole dataset
    pub async fn scan_orphans(&self) -> IntegrityResult<Vec<IntegrityIssue>> {
        let mut issues = Vec::new();

        let orders = reference::orphan_order_ids(self.pool()).await?;
        if !orders.is_empty() {
            issues.push(orphan_issue(
                IssueCode::OrphanOrders,
                "order(s) without a valid user",
                &orders,
                "Reassign these orders to existing users",
            ));
        }

        let groups = reference::orphan_group_ids(self.pool()).await?;
        if !groups.is_empty() {
            issues.push(orphan_issue(
                IssueCode::OrphanSupplierGroups,
                "supplier group(s) without a valid supplier",
                &groups,
                "Restore the suppliers or move these groups",
            ));
        }

        let items = reference::orphan_item_ids(self.pool()).await?;
        if !items.is_empty() {
            issues.push(orphan_issue(
                IssueCode::OrphanItems,
                "item(s) without a valid product",
                &items,
                "Restore the products or remove these items",
            ));
        }

        Ok(issues)
    }

    /// Audit every order, scan for orphans and persist the run.
    ///
    /// Fails only when the order list itself cannot be read.
    pub async fn audit_system(&self) -> IntegrityResult<SystemIntegrityReport> {
        // Correlates the log lines of one run
        let run_id = shared::util::snowflake_id();
        let order_ids = order::list_ids(self.pool()).await?;
        tracing::info!(run_id, orders = order_ids.len(), "System audit started");

        let mut order_reports = Vec::new();
        let mut structural_issues = Vec::new();
        let mut scores = Vec::with_capacity(order_ids.len());
        let mut counts = IssueCounts::default();
        let mut failed_orders = 0usize;

        for &order_id in &order_ids {
            match self.audit_order(order_id).await {
                Ok(report) => {
                    scores.push(report.score);
                    counts.merge(&report.counts);
                    if !report.is_clean() {
                        order_reports.push(report);
                    }
                }
                Err(e) => {
                    tracing::warn!(run_id, order_id, error = %e, "Order audit failed, reporting as critical issue");
                    failed_orders += 1;
                    structural_issues.push(
                        IntegrityIssue::new(
                            Severity::Critical,
                            IssueCategory::Data,
                            IssueCode::AuditFailed,
                            IssueTarget::Order(order_id),
                            format!("Order {order_id} could not be audited: {e}"),
                        )
                        .with_suggestion("Inspect the stored row for unreadable values"),
                    );
                }
            }
        }

        match self.scan_orphans().await {
            Ok(orphans) => structural_issues.extend(orphans),
            Err(e) => {
                tracing::warn!(run_id, error = %e, "Orphan scan failed, reporting as critical issue");
                structural_issues.push(IntegrityIssue::new(
                    Severity::Critical,
                    IssueCategory::Reference,
                    IssueCode::AuditFailed,
                    IssueTarget::System,
                    format!("Orphan scan could not complete: {e}"),
                ));
            }
        }

        for issue in &structural_issues {
            counts.add(issue.severity);
        }

        let report = SystemIntegrityReport {
            total_orders: order_ids.len(),
            audited_orders: scores.len(),
            failed_orders,
            orders_with_issues: order_reports.len() + failed_orders,
            counts,
            average_score: average(&scores),
            order_reports,
            structural_issues,
            generated_at: shared::util::now_millis(),
        };

        match audit_run::insert(self.pool(), &report).await {
            Ok(row_id) => tracing::debug!(run_id, row_id, "Audit run persisted"),
            Err(e) => tracing::warn!(run_id, error = %e, "Failed to persist audit run"),
        }

        tracing::info!(
            run_id,
            total_orders = report.total_orders,
            failed_orders = report.failed_orders,
            orders_with_issues = report.orders_with_issues,
            critical = report.counts.critical,
            warning = report.counts.warning,
            average_score = report.average_score,
            "System audit completed"
        );
        audit_log!(
            "system",
            "integrity_audit",
            "system",
            format!(
                "orders={} issues={} avg_score={:.2}",
                report.total_orders,
                report.counts.total(),
                report.average_score
            )
        );

        Ok(report)
    }

    /// Most recent persisted system audit
    pub async fn latest_run(&self) -> IntegrityResult<Option<AuditRun>> {
        Ok(audit_run::find_latest(self.pool()).await?)
    }

    pub async fn recent_runs(&self, limit: i64) -> IntegrityResult<Vec<AuditRun>> {
        Ok(audit_run::find_recent(self.pool(), limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 100.0);
        assert_eq!(average(&[100, 80]), 90.0);
        assert_eq!(average(&[100, 100, 80]), 93.33);
    }

    #[test]
    fn test_orphan_issue() {
        let issue = orphan_issue(IssueCode::OrphanItems, "item(s) without a valid product", &[3, 7], "x");
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.target, IssueTarget::System);
        assert_eq!(issue.description, "2 item(s) without a valid product");
        assert_eq!(issue.observed.as_deref(), Some("3, 7"));
    }
}
