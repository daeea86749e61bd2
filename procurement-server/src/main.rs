use procurement_server::{Config, ProcurementState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    setup_environment(&config)?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "Procurement server starting"
    );

    // 2. 初始化服务状态
    let state = ProcurementState::initialize(&config).await?;

    // 3. 系统审计 (每次运行一次)
    let report = state.auditor.audit_system().await?;
    for issue in &report.structural_issues {
        tracing::warn!(
            code = ?issue.code,
            target = ?issue.target,
            "{}",
            issue.description
        );
    }

    // 4. 可选自动修复
    if config.audit_auto_fix {
        let fixable: Vec<i64> = report
            .order_reports
            .iter()
            .filter(|r| r.issues.iter().any(|i| i.code.is_auto_fixable()))
            .map(|r| r.order_id)
            .collect();

        let mut fixed_total = 0usize;
        for order_id in fixable {
            match state.auditor.auto_fix(order_id, "system").await {
                Ok(result) => fixed_total += result.fixed,
                Err(e) => tracing::error!(order_id, error = %e, "Auto-fix failed"),
            }
        }
        tracing::info!(fixed = fixed_total, "Auto-fix pass completed");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    state.pool.close().await;
    Ok(())
}
