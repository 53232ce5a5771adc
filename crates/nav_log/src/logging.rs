//! Structured logging setup with tracing

use crate::LogConfig;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix used by the rolling appender (`postview.log.YYYY-MM-DD`)
pub const LOG_FILE_PREFIX: &str = "postview.log";

/// Keeps the non-blocking file writer alive
#[must_use = "dropping the guard stops the log file writer"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the logging system
pub fn init_logging(config: &LogConfig) -> anyhow::Result<LogGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = if config.file {
        let dir = config.resolved_dir();
        std::fs::create_dir_all(&dir)?;

        let appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        (Some(fmt::layer().json().with_writer(non_blocking)), Some(guard))
    } else {
        (None, None)
    };

    // Development: pretty console output
    #[cfg(debug_assertions)]
    let console_layer = config
        .console
        .then(|| fmt::layer().pretty().with_writer(std::io::stderr));

    #[cfg(not(debug_assertions))]
    let console_layer = config
        .console
        .then(|| fmt::layer().compact().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(level = %config.level, file = config.file, "Logging initialized");
    Ok(LogGuard { _file: guard })
}

/// Clean up rolled log files in `dir` older than `days`
pub fn cleanup_old_logs(dir: &Path, days: u32) -> anyhow::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let threshold = SystemTime::now() - Duration::from_secs(u64::from(days) * 24 * 60 * 60);
    let mut deleted = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }

        let modified = entry.metadata().and_then(|m| m.modified());
        if let Ok(modified) = modified {
            if modified < threshold && std::fs::remove_file(&path).is_ok() {
                deleted += 1;
                tracing::debug!("Deleted old log: {:?}", path);
            }
        }
    }

    tracing::info!("Cleaned up {} old log files", deleted);
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert_eq!(cleanup_old_logs(&missing, 7).unwrap(), 0);
    }

    #[test]
    fn test_cleanup_only_touches_log_files() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join(format!("{}.2026-01-01", LOG_FILE_PREFIX));
        let other = temp_dir.path().join("notes.txt");
        std::fs::write(&log, b"{}").unwrap();
        std::fs::write(&other, b"keep").unwrap();

        // Nothing is older than a week yet
        assert_eq!(cleanup_old_logs(temp_dir.path(), 7).unwrap(), 0);
        assert!(log.exists());

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cleanup_old_logs(temp_dir.path(), 0).unwrap(), 1);
        assert!(!log.exists());
        assert!(other.exists());
    }
}
