//! Order Item Repository

use super::{RepoError, RepoResult};
use shared::models::{ItemContext, OrderItem};
use sqlx::SqliteExecutor;

const ITEM_COLUMNS: &str = "i.id, i.order_supplier_id, i.product_id, i.contract_id, i.quantity, i.unit_price, i.subtotal, i.status, i.created_at, i.updated_at";

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<OrderItem>> {
    let item = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item i WHERE i.id = ?"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(item)
}

/// Items of every supplier group of the order
pub async fn find_by_order(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item i JOIN order_supplier g ON g.id = i.order_supplier_id WHERE g.order_id = ? ORDER BY i.id"
    ))
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(items)
}

/// Resolve an item to its group and order.
///
/// `None` when the item, its group or its order is missing.
pub async fn find_context(exec: impl SqliteExecutor<'_>, item_id: i64) -> RepoResult<Option<ItemContext>> {
    let ctx = sqlx::query_as::<_, ItemContext>(
        "SELECT i.id AS item_id, i.order_supplier_id, g.order_id, g.supplier_id, i.product_id, i.contract_id, i.quantity, i.unit_price, i.status AS item_status, o.status AS order_status FROM order_item i JOIN order_supplier g ON g.id = i.order_supplier_id JOIN purchase_order o ON o.id = g.order_id WHERE i.id = ?",
    )
    .bind(item_id)
    .fetch_optional(exec)
    .await?;
    Ok(ctx)
}

/// Raw item statuses of an order (deriver input)
pub async fn statuses_by_order(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<String>> {
    let statuses = sqlx::query_scalar::<_, String>(
        "SELECT i.status FROM order_item i JOIN order_supplier g ON g.id = i.order_supplier_id WHERE g.order_id = ? ORDER BY i.id",
    )
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(statuses)
}

/// Raw item statuses of one supplier group
pub async fn statuses_by_group(exec: impl SqliteExecutor<'_>, group_id: i64) -> RepoResult<Vec<String>> {
    let statuses = sqlx::query_scalar::<_, String>(
        "SELECT status FROM order_item WHERE order_supplier_id = ? ORDER BY id",
    )
    .bind(group_id)
    .fetch_all(exec)
    .await?;
    Ok(statuses)
}

pub async fn update_status(exec: impl SqliteExecutor<'_>, id: i64, status: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE order_item SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(exec)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order item {id} not found")));
    }
    Ok(())
}

pub async fn update_subtotal(exec: impl SqliteExecutor<'_>, id: i64, subtotal: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE order_item SET subtotal = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(subtotal)
        .bind(now)
        .bind(id)
        .execute(exec)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order item {id} not found")));
    }
    Ok(())
}
