//! Integrity Audit Run Repository

use super::{RepoError, RepoResult};
use shared::models::{AuditRun, SystemIntegrityReport};
use sqlx::SqliteExecutor;

const RUN_SELECT: &str = "SELECT id, total_orders, audited_orders, failed_orders, orders_with_issues, critical_count, warning_count, info_count, structural_count, average_score, details, created_at FROM integrity_audit_run";

/// Persist the summary of a system audit.
///
/// The full report is kept as JSON only when something was found.
pub async fn insert(exec: impl SqliteExecutor<'_>, report: &SystemIntegrityReport) -> RepoResult<i64> {
    let details = if report.counts.total() > 0 {
        Some(serde_json::to_string(report).map_err(|e| RepoError::Database(e.to_string()))?)
    } else {
        None
    };

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO integrity_audit_run (total_orders, audited_orders, failed_orders, orders_with_issues, critical_count, warning_count, info_count, structural_count, average_score, details, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) RETURNING id",
    )
    .bind(report.total_orders as i64)
    .bind(report.audited_orders as i64)
    .bind(report.failed_orders as i64)
    .bind(report.orders_with_issues as i64)
    .bind(report.counts.critical as i64)
    .bind(report.counts.warning as i64)
    .bind(report.counts.info as i64)
    .bind(report.structural_issues.len() as i64)
    .bind(report.average_score)
    .bind(details)
    .bind(report.generated_at)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

pub async fn find_latest(exec: impl SqliteExecutor<'_>) -> RepoResult<Option<AuditRun>> {
    let run = sqlx::query_as::<_, AuditRun>(&format!("{RUN_SELECT} ORDER BY id DESC LIMIT 1"))
        .fetch_optional(exec)
        .await?;
    Ok(run)
}

pub async fn find_recent(exec: impl SqliteExecutor<'_>, limit: i64) -> RepoResult<Vec<AuditRun>> {
    let runs = sqlx::query_as::<_, AuditRun>(&format!("{RUN_SELECT} ORDER BY id DESC LIMIT ?"))
        .bind(limit)
        .fetch_all(exec)
        .await?;
    Ok(runs)
}
