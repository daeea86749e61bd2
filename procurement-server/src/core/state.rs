use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::integrity::IntegrityAuditor;
use crate::orders::{OrderStateMachine, ReceivingService};
use crate::services::{
    InventoryService, ReservationService, SqliteInventoryService, SqliteReservationService,
};

/// 服务状态 - 持有所有服务的共享引用
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | state_machine | 显式状态流转 |
/// | receiving | 收货累加 |
/// | auditor | 完整性审计 |
///
/// Cloning is shallow; every service shares the same pool.
#[derive(Clone)]
pub struct ProcurementState {
    pub config: Config,
    pub pool: SqlitePool,
    pub state_machine: OrderStateMachine,
    pub receiving: ReceivingService,
    pub auditor: IntegrityAuditor,
}

impl ProcurementState {
    /// Open the configured database and wire the services on top of it
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// Wire the services with the SQLite-backed collaborators
    pub fn with_db(config: Config, db: DbService) -> Self {
        let reservations: Arc<dyn ReservationService> =
            Arc::new(SqliteReservationService::new(db.pool.clone()));
        let inventory: Arc<dyn InventoryService> =
            Arc::new(SqliteInventoryService::new(db.pool.clone()));
        Self::with_collaborators(config, db, reservations, inventory)
    }

    /// Wire the services with caller-supplied collaborators
    pub fn with_collaborators(
        config: Config,
        db: DbService,
        reservations: Arc<dyn ReservationService>,
        inventory: Arc<dyn InventoryService>,
    ) -> Self {
        let pool = db.pool;
        let state_machine = OrderStateMachine::new(pool.clone(), reservations.clone());
        let receiving = ReceivingService::new(
            pool.clone(),
            reservations,
            inventory,
            config.receipt_retry_limit,
        );
        let auditor = IntegrityAuditor::new(pool.clone());

        Self {
            config,
            pool,
            state_machine,
            receiving,
            auditor,
        }
    }
}
