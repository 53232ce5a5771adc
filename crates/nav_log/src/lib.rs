//! postview logging & crash reporting
//!
//! Structured logging through `tracing`, a crash-report panic hook and,
//! in debug builds, a background deadlock detector.

mod logging;
mod panic_hook;

pub use logging::{cleanup_old_logs, init_logging, LogGuard, LOG_FILE_PREFIX};
pub use panic_hook::{build_crash_report, init_panic_hook};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging configuration, embedded in the viewer configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    /// Human readable output on stderr
    pub console: bool,
    /// JSON output to a daily rolling file
    pub file: bool,
    /// Override for the log directory
    pub dir: Option<PathBuf>,
    /// Log files older than this many days are removed at startup
    pub retention_days: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: true,
            dir: None,
            retention_days: 7,
        }
    }
}

impl LogConfig {
    /// Directory the rolling file appender writes into
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(log_dir)
    }
}

/// Default log directory for the application
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "postview", "postview")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize all observability features.
///
/// The returned guard flushes the file writer when dropped, so keep it
/// alive for the lifetime of the process.
pub fn init(config: &LogConfig) -> anyhow::Result<LogGuard> {
    let guard = init_logging(config)?;
    init_panic_hook();

    #[cfg(debug_assertions)]
    init_deadlock_detector();

    Ok(guard)
}

#[cfg(debug_assertions)]
fn init_deadlock_detector() {
    use std::thread;
    use std::time::Duration;

    let spawned = thread::Builder::new()
        .name("deadlock-detector".into())
        .spawn(|| loop {
            thread::sleep(Duration::from_secs(10));
            let deadlocks = parking_lot::deadlock::check_deadlock();
            if deadlocks.is_empty() {
                continue;
            }
            tracing::error!(count = deadlocks.len(), "Deadlock detected");
            for (i, threads) in deadlocks.iter().enumerate() {
                for t in threads {
                    tracing::error!(
                        cycle = i,
                        thread_id = ?t.thread_id(),
                        backtrace = ?t.backtrace(),
                        "Deadlocked thread"
                    );
                }
            }
        });

    if let Err(e) = spawned {
        tracing::warn!("Failed to start deadlock detector: {}", e);
    }
}
