//! Purchase Order Repository

use super::{RepoError, RepoResult};
use crate::db::begin_write;
use crate::orders::money::{line_subtotal, sum_money, to_f64};
use shared::models::{OrderDraft, PurchaseOrder};
use sqlx::{SqliteExecutor, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, order_number, status, total_value, notes, user_id, created_at, updated_at FROM purchase_order";

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<PurchaseOrder>> {
    let order = sqlx::query_as::<_, PurchaseOrder>(&format!("{ORDER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(order)
}

/// Raw stored status, without decoding the rest of the row
pub async fn find_status(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<String>> {
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM purchase_order WHERE id = ?")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(status)
}

/// All order ids (the system audit loads each order separately)
pub async fn list_ids(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM purchase_order ORDER BY id")
        .fetch_all(exec)
        .await?;
    Ok(ids)
}

/// Compare-and-swap the order status.
///
/// Returns `false` when the stored status is no longer `expected`.
pub async fn update_status(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    expected: &str,
    status: &str,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE purchase_order SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .bind(expected)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Overwrite the stored order total
pub async fn update_total(exec: impl SqliteExecutor<'_>, id: i64, total_value: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE purchase_order SET total_value = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(total_value)
        .bind(now)
        .bind(id)
        .execute(exec)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Persist an order handed over by the placement flow.
///
/// Subtotals and the order total are computed here, status starts at PENDENTE.
pub async fn create_with_items(pool: &SqlitePool, draft: OrderDraft) -> RepoResult<i64> {
    if draft.order_number.trim().is_empty() {
        return Err(RepoError::Validation("order_number must not be empty".into()));
    }
    let now = shared::util::now_millis();

    let mut tx = begin_write(pool).await?;

    let order_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO purchase_order (order_number, status, total_value, notes, user_id, created_at, updated_at) VALUES (?1, 'PENDENTE', 0, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(&draft.order_number)
    .bind(&draft.notes)
    .bind(draft.user_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut group_totals = Vec::with_capacity(draft.groups.len());
    for group in &draft.groups {
        let subtotals: Vec<_> = group
            .items
            .iter()
            .map(|item| line_subtotal(item.quantity, item.unit_price))
            .collect();
        let group_subtotal = sum_money(subtotals.iter().copied());
        group_totals.push(group_subtotal);

        let group_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO order_supplier (order_id, supplier_id, subtotal, status, created_at, updated_at) VALUES (?1, ?2, ?3, 'PENDENTE', ?4, ?4) RETURNING id",
        )
        .bind(order_id)
        .bind(group.supplier_id)
        .bind(to_f64(group_subtotal))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for (item, subtotal) in group.items.iter().zip(subtotals) {
            sqlx::query(
                "INSERT INTO order_item (order_supplier_id, product_id, contract_id, quantity, unit_price, subtotal, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'PENDENTE', ?7, ?7)",
            )
            .bind(group_id)
            .bind(item.product_id)
            .bind(item.contract_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(to_f64(subtotal))
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    sqlx::query("UPDATE purchase_order SET total_value = ?1 WHERE id = ?2")
        .bind(to_f64(sum_money(group_totals)))
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(order_id)
}
