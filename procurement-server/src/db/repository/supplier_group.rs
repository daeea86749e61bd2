//! Order Supplier Group Repository

use super::{RepoError, RepoResult};
use shared::models::OrderSupplierGroup;
use sqlx::SqliteExecutor;

const GROUP_SELECT: &str = "SELECT id, order_id, supplier_id, subtotal, status, created_at, updated_at FROM order_supplier";

pub async fn find_by_order(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<OrderSupplierGroup>> {
    let groups = sqlx::query_as::<_, OrderSupplierGroup>(&format!(
        "{GROUP_SELECT} WHERE order_id = ? ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(groups)
}

pub async fn update_status(exec: impl SqliteExecutor<'_>, id: i64, status: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE order_supplier SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(exec)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Supplier group {id} not found")));
    }
    Ok(())
}
