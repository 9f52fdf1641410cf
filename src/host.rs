//! Mounting contract between the panel and whatever hosts it.
//!
//! A host hands over the initial tree wrapped in a `{"Configuration": ...}`
//! envelope and receives every accepted snapshot back so it can persist it.
//! [`FileHost`] keeps that envelope in a JSON file on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::atomic_file::atomic_write;
use crate::config::ConfigurationTree;
use crate::error::ConfigValidationError;
use crate::store::ConfigStore;

/// Host payload envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig<T = ConfigurationTree> {
    #[serde(rename = "Configuration")]
    pub configuration: T,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to read tool config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write tool config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid tool config at {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: ConfigValidationError,
    },
    #[error("Failed to move unreadable tool config {path} to {target}: {source}")]
    SetAside {
        path: PathBuf,
        target: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize tool config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// What the panel needs from its host.
pub trait DesignerHost {
    /// The tree to start from, or `None` when the host has nothing stored yet.
    fn load(&self) -> Result<Option<ConfigurationTree>, HostError>;

    /// Called with every accepted tree.
    fn persist(&mut self, tree: &ConfigurationTree) -> Result<(), HostError>;

    /// Move stored data that failed to load somewhere `persist` cannot reach.
    ///
    /// Returns where it went. `None` means it could not be kept, and the
    /// mount then leaves persistence off.
    fn set_aside(&mut self) -> Result<Option<PathBuf>, HostError> {
        Ok(None)
    }
}

/// Attempts at a free `.invalid` name before giving up.
const SET_ASIDE_ATTEMPTS: usize = 100;

/// Host that keeps the tool config in a JSON file.
#[derive(Debug, Clone)]
pub struct FileHost {
    path: PathBuf,
}

impl FileHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DesignerHost for FileHost {
    fn load(&self) -> Result<Option<ConfigurationTree>, HostError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path).map_err(|source| HostError::Read {
            path: self.path.clone(),
            source,
        })?;
        decode_tool_config(&text)
            .map(Some)
            .map_err(|source| HostError::Invalid {
                path: self.path.clone(),
                source,
            })
    }

    fn persist(&mut self, tree: &ConfigurationTree) -> Result<(), HostError> {
        let data = encode_tool_config(tree).map_err(|source| HostError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, data.as_bytes()).map_err(|source| HostError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn set_aside(&mut self) -> Result<Option<PathBuf>, HostError> {
        let Some(target) = (0..SET_ASIDE_ATTEMPTS)
            .map(|attempt| set_aside_path(&self.path, attempt))
            .find(|candidate| !candidate.exists())
        else {
            return Ok(None);
        };
        std::fs::rename(&self.path, &target).map_err(|source| HostError::SetAside {
            path: self.path.clone(),
            target: target.clone(),
            source,
        })?;
        Ok(Some(target))
    }
}

/// `tool_config.json.invalid`, then `tool_config.json.invalid-1` and so on.
fn set_aside_path(path: &Path, attempt: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    if attempt == 0 {
        name.push(".invalid");
    } else {
        name.push(format!(".invalid-{attempt}"));
    }
    PathBuf::from(name)
}

/// Decode and validate a `{"Configuration": ...}` document.
pub fn decode_tool_config(text: &str) -> Result<ConfigurationTree, ConfigValidationError> {
    let envelope: ToolConfig<serde_json::Value> = serde_json::from_str(text)
        .map_err(|source| ConfigValidationError::Malformed { source })?;
    ConfigurationTree::from_value(envelope.configuration)
}

pub fn encode_tool_config(tree: &ConfigurationTree) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ToolConfig {
        configuration: tree,
    })
}

/// Build the store for a freshly mounted panel.
///
/// Falls back to the built-in defaults when the host has nothing usable.
/// With `persist_on_update`, every accepted snapshot is handed back to the
/// host; a failed write is logged and the in-memory tree is kept. Stored data
/// that failed to load is never overwritten: it is set aside first, or
/// persistence stays off for this mount.
pub fn mount<H>(host: H, persist_on_update: bool) -> ConfigStore
where
    H: DesignerHost + 'static,
{
    let mut host = host;
    let mut persist_on_update = persist_on_update;
    let initial = match host.load() {
        Ok(Some(tree)) => tree,
        Ok(None) => {
            info!("Host has no stored configuration; starting from defaults");
            ConfigurationTree::default()
        }
        Err(err) => {
            warn!("Ignoring host configuration: {err}");
            if persist_on_update && !preserve_unreadable(&mut host, &err) {
                warn!("Persistence disabled so the stored configuration is not overwritten");
                persist_on_update = false;
            }
            ConfigurationTree::default()
        }
    };
    let mut store = ConfigStore::new(initial).unwrap_or_else(|err| {
        warn!("Host configuration failed validation: {err}");
        ConfigStore::default()
    });
    if persist_on_update {
        store.subscribe(move |snapshot| {
            if let Err(err) = host.persist(snapshot) {
                warn!("Failed to persist configuration: {err}");
            }
        });
    }
    info!(persist_on_update, "Panel mounted");
    store
}

/// Whether the data behind `err` is safe from the next persist.
fn preserve_unreadable<H: DesignerHost>(host: &mut H, err: &HostError) -> bool {
    if !matches!(err, HostError::Invalid { .. }) {
        return false;
    }
    match host.set_aside() {
        Ok(Some(target)) => {
            warn!("Unreadable configuration moved to {}", target.display());
            true
        }
        Ok(None) => false,
        Err(err) => {
            warn!("{err}");
            false
        }
    }
}
