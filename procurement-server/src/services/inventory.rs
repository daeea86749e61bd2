//! SQLite-backed inventory service

use super::{CollaboratorError, InventoryService};
use crate::db::repository::inventory_lot;
use async_trait::async_trait;
use shared::models::{InventoryLot, LotCreate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqliteInventoryService {
    pool: SqlitePool,
}

impl SqliteInventoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryService for SqliteInventoryService {
    async fn create_lot(&self, lot: LotCreate) -> Result<InventoryLot, CollaboratorError> {
        let created = inventory_lot::create(&self.pool, &lot)
            .await
            .map_err(|e| CollaboratorError::Inventory(e.to_string()))?;
        tracing::info!(
            lot_id = created.id,
            product_id = created.product_id,
            lot = %created.lot,
            quantity = created.quantity,
            "Inventory lot created"
        );
        Ok(created)
    }
}
