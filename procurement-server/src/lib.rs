//! Procurement Server - 学校餐饮采购订单后端
//!
//! # 架构概述
//!
//! - **订单生命周期** (`orders`): 显式状态机、收货累加、状态推导
//! - **完整性审计** (`integrity`): 引用/金额/状态一致性检查与评分，可选自动修复
//! - **协作服务** (`services`): 合同预留与库存批次 (best-effort)
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移与仓储函数
//!
//! # 模块结构
//!
//! ```text
//! procurement-server/src/
//! ├── core/          # 配置、服务状态、启动环境
//! ├── db/            # 连接池、迁移、仓储
//! ├── orders/        # 状态机、收货、状态推导
//! ├── integrity/     # 审计、评分、自动修复
//! ├── services/      # 预留与库存协作接口
//! └── utils/         # 日志、校验
//! ```

pub mod core;
pub mod db;
pub mod integrity;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, ProcurementState, setup_environment};
pub use db::DbService;
pub use integrity::{IntegrityAuditor, IntegrityError};
pub use orders::{OrderError, OrderStateMachine, ReceivingService};
pub use services::{CollaboratorError, InventoryService, ReservationService};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____                                                       __
   / __ \_________  _______  __________  ____ ___  ___  ____  / /_
  / /_/ / ___/ __ \/ ___/ / / / ___/ _ \/ __ `__ \/ _ \/ __ \/ __/
 / ____/ /  / /_/ / /__/ /_/ / /  /  __/ / / / / /  __/ / / / /_
/_/   /_/   \____/\___/\__,_/_/   \___/_/ /_/ /_/\___/_/ /_/\__/
"#
    );
}
