//! Logging setup
//!
//! Log records go to a file under the configured directory so the console
//! stays reserved for the conversation. `RUST_LOG` overrides the filter.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::{AgentError, AgentResult, LogConfig, LogFormat};

const DEFAULT_FILTER: &str = "confluence_agent=info";

/// Keeps the background log writer alive; drop it last
pub struct LogGuard {
    _guard: WorkerGuard,
    /// File this process logs to
    pub path: PathBuf,
}

/// Log file name for a process started at `started`
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("agent-{}.log", started.format("%Y%m%d-%H%M%S"))
}

/// Install the global subscriber
///
/// Fails if the directory cannot be created or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> AgentResult<LogGuard> {
    fs::create_dir_all(&config.directory)?;

    let file_name = log_file_name(Local::now());
    let appender = tracing_appender::rolling::never(&config.directory, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(layer).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
    installed.map_err(|e| AgentError::InvalidConfig(format!("Failed to install logger: {}", e)))?;

    Ok(LogGuard {
        _guard: guard,
        path: config.directory.join(file_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name() {
        let started = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(log_file_name(started), "agent-20260307-090501.log");
    }

    #[test]
    fn test_init_logging_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let config = LogConfig {
            directory: temp.path().join("nested").join("logs"),
            format: LogFormat::Json,
        };

        let guard = init_logging(&config).unwrap();
        tracing::info!("[Logging] test record");

        assert!(config.directory.is_dir());
        assert_eq!(guard.path.parent(), Some(config.directory.as_path()));

        // Only one global subscriber per process.
        assert!(init_logging(&config).is_err());
    }
}
