//! Contract Reservation Repository

use super::{RepoError, RepoResult};
use shared::models::Reservation;
use sqlx::SqliteExecutor;

const RESERVATION_SELECT: &str = "SELECT id, order_id, order_item_id, contract_id, amount, consumed_amount, status, reason, created_at, updated_at FROM contract_reservation";

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(&format!("{RESERVATION_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(reservation)
}

pub async fn find_by_order(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "{RESERVATION_SELECT} WHERE order_id = ? ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(reservations)
}

pub async fn create(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
    order_item_id: Option<i64>,
    contract_id: i64,
    amount: f64,
) -> RepoResult<i64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(RepoError::Validation(format!(
            "Reservation amount must be positive, got {amount}"
        )));
    }
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO contract_reservation (order_id, order_item_id, contract_id, amount, consumed_amount, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, 'ATIVA', ?5, ?5) RETURNING id",
    )
    .bind(order_id)
    .bind(order_item_id)
    .bind(contract_id)
    .bind(amount)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

/// Move `amount` into consumed balance (capped at the reserved amount).
///
/// The reservation becomes CONSUMIDA once fully consumed. Only ATIVA rows are touched.
pub async fn consume(exec: impl SqliteExecutor<'_>, id: i64, amount: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE contract_reservation SET consumed_amount = MIN(amount, consumed_amount + ?1), status = CASE WHEN consumed_amount + ?1 >= amount - 0.005 THEN 'CONSUMIDA' ELSE status END, updated_at = ?2 WHERE id = ?3 AND status = 'ATIVA'",
    )
    .bind(amount)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Active reservation {id} not found")));
    }
    Ok(())
}

/// Release an active reservation
pub async fn cancel(exec: impl SqliteExecutor<'_>, id: i64, reason: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE contract_reservation SET status = 'CANCELADA', reason = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'ATIVA'",
    )
    .bind(reason)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Active reservation {id} not found")));
    }
    Ok(())
}
