//! 核心模块 - 配置、服务状态与启动环境

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ProcurementState;

use crate::utils::logger;

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    let log_dir_str = log_dir.to_string_lossy();
    logger::init_logger_with_file(&config.log_level, config.log_json, Some(&log_dir_str))?;

    Ok(())
}
