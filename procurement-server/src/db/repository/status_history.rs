//! Order Status History Repository

use super::RepoResult;
use shared::models::{StatusChangeSource, StatusHistoryEntry};
use sqlx::SqliteExecutor;

/// History row to append
#[derive(Debug, Clone)]
pub struct HistoryInsert<'a> {
    pub order_id: i64,
    pub from_status: Option<&'a str>,
    pub to_status: &'a str,
    pub note: Option<&'a str>,
    pub actor: Option<&'a str>,
    pub source: StatusChangeSource,
}

pub async fn insert(exec: impl SqliteExecutor<'_>, entry: HistoryInsert<'_>) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_status_history (order_id, from_status, to_status, note, actor, source, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
    )
    .bind(entry.order_id)
    .bind(entry.from_status)
    .bind(entry.to_status)
    .bind(entry.note)
    .bind(entry.actor)
    .bind(entry.source.as_str())
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

/// History of one order, oldest first
pub async fn find_by_order(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<StatusHistoryEntry>> {
    let entries = sqlx::query_as::<_, StatusHistoryEntry>(
        "SELECT id, order_id, from_status, to_status, note, actor, source, created_at FROM order_status_history WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(entries)
}
