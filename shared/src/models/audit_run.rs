//! Integrity Audit Run Model

use serde::{Deserialize, Serialize};

/// Persisted summary of one system-wide integrity audit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditRun {
    pub id: i64,
    pub total_orders: i64,
    pub audited_orders: i64,
    pub failed_orders: i64,
    pub orders_with_issues: i64,
    pub critical_count: i64,
    pub warning_count: i64,
    pub info_count: i64,
    pub structural_count: i64,
    pub average_score: f64,
    /// Full report JSON when issues were found, None otherwise
    pub details: Option<String>,
    pub created_at: i64,
}
