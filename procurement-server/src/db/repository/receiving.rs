//! Receiving Record Repository
//!
//! One row per order item. Writes are guarded by the `version` column:
//! the first write inserts at version 1, later writes compare-and-swap.

use super::RepoResult;
use shared::models::ReceivingRecord;
use sqlx::SqliteExecutor;

const RECORD_SELECT: &str = "SELECT id, order_item_id, quantity_received, last_received_at, lot, expiry_date, notes, version, created_at, updated_at FROM receiving_record";

/// New state of a receiving record
#[derive(Debug, Clone)]
pub struct ReceivingWrite {
    pub order_item_id: i64,
    pub quantity_received: f64,
    pub last_received_at: i64,
    pub lot: Option<String>,
    pub expiry_date: Option<String>,
    pub notes: Option<String>,
}

pub async fn find_by_item(
    exec: impl SqliteExecutor<'_>,
    order_item_id: i64,
) -> RepoResult<Option<ReceivingRecord>> {
    let record = sqlx::query_as::<_, ReceivingRecord>(&format!(
        "{RECORD_SELECT} WHERE order_item_id = ?"
    ))
    .bind(order_item_id)
    .fetch_optional(exec)
    .await?;
    Ok(record)
}

/// Records of every item of the order
pub async fn find_by_order(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<ReceivingRecord>> {
    let records = sqlx::query_as::<_, ReceivingRecord>(
        "SELECT r.id, r.order_item_id, r.quantity_received, r.last_received_at, r.lot, r.expiry_date, r.notes, r.version, r.created_at, r.updated_at FROM receiving_record r JOIN order_item i ON i.id = r.order_item_id JOIN order_supplier g ON g.id = i.order_supplier_id WHERE g.order_id = ? ORDER BY r.order_item_id",
    )
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(records)
}

/// Insert-or-CAS.
///
/// `expected_version = None` inserts the first record for the item;
/// `Some(v)` updates only while the stored version is still `v`.
/// Returns `false` when another writer got there first.
pub async fn upsert(
    exec: impl SqliteExecutor<'_>,
    expected_version: Option<i64>,
    data: &ReceivingWrite,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = match expected_version {
        None => {
            sqlx::query(
                "INSERT INTO receiving_record (order_item_id, quantity_received, last_received_at, lot, expiry_date, notes, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7) ON CONFLICT(order_item_id) DO NOTHING",
            )
            .bind(data.order_item_id)
            .bind(data.quantity_received)
            .bind(data.last_received_at)
            .bind(&data.lot)
            .bind(&data.expiry_date)
            .bind(&data.notes)
            .bind(now)
            .execute(exec)
            .await?
        }
        Some(version) => {
            sqlx::query(
                "UPDATE receiving_record SET quantity_received = ?1, last_received_at = ?2, lot = ?3, expiry_date = ?4, notes = ?5, version = version + 1, updated_at = ?6 WHERE order_item_id = ?7 AND version = ?8",
            )
            .bind(data.quantity_received)
            .bind(data.last_received_at)
            .bind(&data.lot)
            .bind(&data.expiry_date)
            .bind(&data.notes)
            .bind(now)
            .bind(data.order_item_id)
            .bind(version)
            .execute(exec)
            .await?
        }
    };
    Ok(rows.rows_affected() > 0)
}
