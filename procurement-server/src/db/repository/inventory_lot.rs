//! Inventory Lot Repository

use super::{RepoError, RepoResult};
use shared::models::{InventoryLot, LotCreate};
use sqlx::SqliteExecutor;

const LOT_SELECT: &str = "SELECT id, product_id, lot, quantity, expiry_date, supplier_id, notes, created_at FROM inventory_lot";

pub async fn create(exec: impl SqliteExecutor<'_>, data: &LotCreate) -> RepoResult<InventoryLot> {
    if !data.quantity.is_finite() || data.quantity <= 0.0 {
        return Err(RepoError::Validation(format!(
            "Lot quantity must be positive, got {}",
            data.quantity
        )));
    }
    let now = shared::util::now_millis();
    let lot = sqlx::query_as::<_, InventoryLot>(
        "INSERT INTO inventory_lot (product_id, lot, quantity, expiry_date, supplier_id, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id, product_id, lot, quantity, expiry_date, supplier_id, notes, created_at",
    )
    .bind(data.product_id)
    .bind(&data.lot)
    .bind(data.quantity)
    .bind(&data.expiry_date)
    .bind(data.supplier_id)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(lot)
}

pub async fn find_by_product(exec: impl SqliteExecutor<'_>, product_id: i64) -> RepoResult<Vec<InventoryLot>> {
    let lots = sqlx::query_as::<_, InventoryLot>(&format!(
        "{LOT_SELECT} WHERE product_id = ? ORDER BY id"
    ))
    .bind(product_id)
    .fetch_all(exec)
    .await?;
    Ok(lots)
}
