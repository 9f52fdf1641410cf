//! Panel settings persisted as TOML under the app root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::{self, AppDirError};
use crate::atomic_file::atomic_write;
use crate::logging::DEFAULT_FILTER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Host tool-config JSON; `None` means `<app root>/tool_config.json`.
    pub tool_config_path: Option<PathBuf>,
    /// Write every accepted update back to the tool-config file.
    pub persist_on_update: bool,
    pub log_filter: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            tool_config_path: None,
            persist_on_update: true,
            log_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl PanelSettings {
    /// The tool-config file to mount, falling back to the app root default.
    pub fn resolve_tool_config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.tool_config_path {
            Some(path) => Ok(path.clone()),
            None => app_dirs::default_tool_config_path().map_err(ConfigError::from),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No suitable config directory found")]
    NoConfigDir,
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize settings to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

impl From<AppDirError> for ConfigError {
    fn from(error: AppDirError) -> Self {
        match error {
            AppDirError::NoBaseDir => ConfigError::NoConfigDir,
            AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
        }
    }
}

/// Load `<app root>/settings.toml`, or defaults when it does not exist yet.
pub fn load_or_default() -> Result<PanelSettings, ConfigError> {
    let path = app_dirs::settings_path()?;
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<PanelSettings, ConfigError> {
    if !path.exists() {
        return Ok(PanelSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save(settings: &PanelSettings) -> Result<(), ConfigError> {
    let path = app_dirs::settings_path()?;
    save_to(settings, &path)
}

pub fn save_to(settings: &PanelSettings, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, data.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_from(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, PanelSettings::default());
        assert!(settings.persist_on_update);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "persist_on_update = false\n").unwrap();
        let settings = load_from(&path).unwrap();
        assert!(!settings.persist_on_update);
        assert_eq!(settings.tool_config_path, None);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = PanelSettings {
            tool_config_path: Some(dir.path().join("imdb.json")),
            persist_on_update: false,
            log_filter: "classifier_panel=debug".to_string(),
        };
        save_to(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "persist_on_update = [").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("settings.toml"));
    }

    #[test]
    fn explicit_tool_config_path_wins() {
        let settings = PanelSettings {
            tool_config_path: Some(PathBuf::from("/tmp/tool.json")),
            ..PanelSettings::default()
        };
        assert_eq!(
            settings.resolve_tool_config_path().unwrap(),
            PathBuf::from("/tmp/tool.json")
        );
    }
}
