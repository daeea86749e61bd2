//! Logging Infrastructure
//!
//! Structured logging setup for development and production runs.
//! Features:
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs (`target: "audit"`, never deleted)

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Days an application log file is kept
const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Clean up application log files older than the retention window
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // app.YYYY-MM-DD
        let Some(date_part) = name.strip_prefix("app.") else {
            continue;
        };
        if let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

fn console_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn is_audit(meta: &tracing::Metadata<'_>) -> bool {
    meta.target() == "audit"
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - JSON lines (production) or human-readable (development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./work_dir/logs"))
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    // Console layer
    if json_format {
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(console_filter(level))
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_filter(console_filter(level))
                .boxed(),
        );
    }

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_log_dir = log_dir.join("app");
        let audit_log_dir = log_dir.join("audit");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&audit_log_dir)?;

        // Application logs: everything except the audit target
        let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(EnvFilter::new(level))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| !is_audit(meta)))
                .boxed(),
        );

        // Permanent audit logs
        let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit");
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_writer(std::sync::Mutex::new(audit_log))
                .with_filter(tracing_subscriber::filter::filter_fn(is_audit))
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    if let Some(dir) = log_dir
        && let Err(e) = cleanup_old_logs(Path::new(dir))
    {
        tracing::warn!(error = %e, "Failed to cleanup old logs");
    }

    Ok(())
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records business operations that change order state
///
/// Written to the permanent `audit` log files.
///
/// # Examples
/// ```ignore
/// audit_log!("operator-1", "transition", "order:42", "PENDENTE -> CONFIRMADO");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($actor:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            actor = %$actor,
            action = %$action,
            resource = %$resource,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($actor:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            actor = %$actor,
            action = %$action,
            resource = %$resource,
            details = %$details,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("app");
        fs::create_dir_all(&app_dir).unwrap();

        let old = chrono::Local::now().date_naive() - chrono::Duration::days(30);
        let today = chrono::Local::now().date_naive();
        fs::write(app_dir.join(format!("app.{}", old.format("%Y-%m-%d"))), "x").unwrap();
        fs::write(app_dir.join(format!("app.{}", today.format("%Y-%m-%d"))), "x").unwrap();
        fs::write(app_dir.join("unrelated.txt"), "x").unwrap();

        let removed = cleanup_old_logs(dir.path()).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(fs::read_dir(&app_dir).unwrap().count(), 2);
    }

    #[test]
    fn test_cleanup_without_app_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
    }
}
