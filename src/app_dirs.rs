//! Where the panel keeps its settings, logs and the development host's
//! tool-config file.
//!
//! Everything lives under one `.classifier-panel` folder in the OS config
//! directory. `CLASSIFIER_PANEL_CONFIG_HOME` replaces the OS directory for
//! tests and portable setups.

use std::{
    path::{Path, PathBuf},
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

pub const APP_DIR_NAME: &str = ".classifier-panel";
pub const CONFIG_HOME_ENV: &str = "CLASSIFIER_PANEL_CONFIG_HOME";
pub const SETTINGS_FILE_NAME: &str = "settings.toml";
pub const TOOL_CONFIG_FILE_NAME: &str = "tool_config.json";

static CONFIG_BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No suitable base config directory available for panel files")]
    NoBaseDir,
    #[error("Failed to create panel directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.classifier-panel` root, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

pub fn settings_path() -> Result<PathBuf, AppDirError> {
    Ok(app_root_dir()?.join(SETTINGS_FILE_NAME))
}

/// Default location of the host tool-config JSON when settings name none.
pub fn default_tool_config_path() -> Result<PathBuf, AppDirError> {
    Ok(app_root_dir()?.join(TOOL_CONFIG_FILE_NAME))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_base_dir() -> Option<PathBuf> {
    if let Some(path) = CONFIG_BASE_OVERRIDE
        .lock()
        .ok()
        .and_then(|guard| guard.clone())
    {
        return Some(path);
    }
    if let Ok(path) = std::env::var(CONFIG_HOME_ENV) {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Pin the base directory for the lifetime of the returned guard.
///
/// Takes precedence over the environment variable.
pub struct ConfigBaseOverride {
    _private: (),
}

impl ConfigBaseOverride {
    pub fn set(path: &Path) -> Self {
        if let Ok(mut guard) = CONFIG_BASE_OVERRIDE.lock() {
            *guard = Some(path.to_path_buf());
        }
        Self { _private: () }
    }
}

impl Drop for ConfigBaseOverride {
    fn drop(&mut self) {
        if let Ok(mut guard) = CONFIG_BASE_OVERRIDE.lock() {
            *guard = None;
        }
    }
}
