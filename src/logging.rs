//! Tracing for the panel host: stdout plus one file per launch.
//!
//! Log files are named `classifier-panel_<timestamp>.log`, so sorting by name
//! sorts by launch time and pruning needs no file metadata.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::TryInitError};

use crate::app_dirs::{self, AppDirError};
use crate::settings::PanelSettings;

/// Filter used when neither `RUST_LOG` nor the settings name a usable one.
pub const DEFAULT_FILTER: &str = "info";
const FILE_PREFIX: &str = "classifier-panel_";
const FILE_SUFFIX: &str = "log";
const KEEP_LOGS: usize = 10;

/// Keeps the file writer flushing for the rest of the process.
struct ActiveLog {
    path: PathBuf,
    _guard: WorkerGuard,
}

static ACTIVE: OnceLock<ActiveLog> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error(transparent)]
    Dir(#[from] AppDirError),
    #[error("Failed to open log file: {0}")]
    Appender(#[from] InitError),
    #[error("Failed to prune log directory {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to name log file: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Where the log files go, how many survive, and what gets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub filter: String,
    pub keep: usize,
}

impl LogConfig {
    /// Logs under the app directory, filtered by `settings.log_filter`.
    pub fn from_settings(settings: &PanelSettings) -> Result<Self, LoggingError> {
        Ok(Self::in_directory(app_dirs::logs_dir()?, settings))
    }

    pub fn in_directory(directory: PathBuf, settings: &PanelSettings) -> Self {
        Self {
            directory,
            filter: settings.log_filter.clone(),
            keep: KEEP_LOGS,
        }
    }

    /// `RUST_LOG` first, then the configured filter, then [`DEFAULT_FILTER`].
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber and return the file this launch writes to.
///
/// Only the first call installs anything; later calls return the same path.
pub fn init(config: &LogConfig) -> Result<PathBuf, LoggingError> {
    if let Some(active) = ACTIVE.get() {
        return Ok(active.path.clone());
    }

    let stem = format!("{FILE_PREFIX}{}", launch_stamp(now_local_or_utc())?);
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&stem)
        .filename_suffix(FILE_SUFFIX)
        .build(&config.directory)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let path = config.directory.join(format!("{stem}.{FILE_SUFFIX}"));

    let timer = local_timer();
    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt::layer().with_timer(timer.clone()))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        )
        .try_init()?;

    let active = ACTIVE.get_or_init(|| ActiveLog {
        path,
        _guard: guard,
    });
    tracing::info!("Logging to {}", active.path.display());
    match prune_logs(&config.directory, config.keep) {
        Ok(removed) if !removed.is_empty() => {
            tracing::debug!(removed = removed.len(), "Pruned old log files");
        }
        Ok(_) => {}
        Err(err) => tracing::warn!("{err}"),
    }
    Ok(active.path.clone())
}

/// Delete all but the newest `keep` panel logs in `dir`, returning what went.
fn prune_logs(dir: &Path, keep: usize) -> Result<Vec<PathBuf>, LoggingError> {
    let prune_err = |source| LoggingError::Prune {
        path: dir.to_path_buf(),
        source,
    };
    let mut logs: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(prune_err)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_panel_log(path))
        .collect();
    logs.sort();
    let excess = logs.len().saturating_sub(keep);
    let removed: Vec<PathBuf> = logs.drain(..excess).collect();
    for path in &removed {
        std::fs::remove_file(path).map_err(prune_err)?;
    }
    Ok(removed)
}

fn is_panel_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(FILE_PREFIX) && name.ends_with(".log"))
}

fn launch_stamp(now: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(now.format(STAMP)?)
}

fn local_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY: &[FormatItem<'static>] =
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(filter: &str) -> LogConfig {
        let settings = PanelSettings {
            log_filter: filter.to_string(),
            ..PanelSettings::default()
        };
        LogConfig::in_directory(PathBuf::from("logs"), &settings)
    }

    #[test]
    fn launch_stamp_sorts_chronologically() {
        let earlier = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let later = OffsetDateTime::from_unix_timestamp(1_700_086_400).unwrap();
        let first = launch_stamp(earlier).unwrap();
        assert_eq!(first, "2023-11-14_22-13-20");
        assert!(first < launch_stamp(later).unwrap());
    }

    #[test]
    fn prune_keeps_newest_panel_logs_only() {
        let dir = tempdir().unwrap();
        for day in 1..=5 {
            let name = format!("{FILE_PREFIX}2024-01-0{day}_00-00-00.log");
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::write(dir.path().join("other.log"), "").unwrap();
        std::fs::write(dir.path().join("settings.toml"), "").unwrap();

        let removed = prune_logs(dir.path(), 2).unwrap();
        assert_eq!(removed.len(), 3);
        assert!(dir.path().join(format!("{FILE_PREFIX}2024-01-05_00-00-00.log")).exists());
        assert!(dir.path().join(format!("{FILE_PREFIX}2024-01-04_00-00-00.log")).exists());
        assert!(!dir.path().join(format!("{FILE_PREFIX}2024-01-03_00-00-00.log")).exists());
        assert!(dir.path().join("other.log").exists());
        assert!(dir.path().join("settings.toml").exists());
    }

    #[test]
    fn prune_under_the_limit_removes_nothing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{FILE_PREFIX}a.log")), "").unwrap();
        assert!(prune_logs(dir.path(), KEEP_LOGS).unwrap().is_empty());
    }

    #[test]
    fn unparsable_filter_falls_back_to_default() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let fallback = config("classifier_panel=loud");
        assert_eq!(fallback.keep, KEEP_LOGS);
        assert_eq!(fallback.env_filter().to_string(), DEFAULT_FILTER);
        assert_eq!(
            config("classifier_panel=debug").env_filter().to_string(),
            "classifier_panel=debug"
        );
    }
}
