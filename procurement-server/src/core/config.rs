use std::path::PathBuf;

/// 服务配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、日志) |
/// | DATABASE_PATH | `<WORK_DIR>/procurement.db` | SQLite 文件路径 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false (production: true) | JSON 日志格式 |
/// | ENVIRONMENT | development | 运行环境 |
/// | AUDIT_AUTO_FIX | false | 审计后自动修复可修复问题 |
/// | RECEIPT_RETRY_LIMIT | 3 | 收货版本冲突重试次数 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/procurement AUDIT_AUTO_FIX=true cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// SQLite database file
    pub database_path: String,
    pub log_level: String,
    pub log_json: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// Apply safe corrections after the system audit
    pub audit_auto_fix: bool,
    /// Version-conflict retries per receipt
    pub receipt_retry_limit: u32,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into());
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("procurement.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(environment == "production"),
            audit_auto_fix: std::env::var("AUDIT_AUTO_FIX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            receipt_retry_limit: std::env::var("RECEIPT_RETRY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            work_dir,
            database_path,
            environment,
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = PathBuf::from(&config.work_dir)
            .join("procurement.db")
            .to_string_lossy()
            .into_owned();
        config
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
