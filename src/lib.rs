//! Configuration and results panel for a text-classification pipeline.
/// Directories for settings, logs and the tool-config file.
pub mod app_dirs;
/// Temp-file-and-rename writes.
pub mod atomic_file;
/// Field binders between tree leaves and widgets.
pub mod binder;
/// Token chip manager.
pub mod chips;
/// Write-back helpers for the training engine.
pub mod collaborator;
/// Configuration tree schema, defaults and validation.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Host mounting contract and file-backed host.
pub mod host;
/// Logging setup.
pub mod logging;
/// egui panel.
pub mod panel;
/// Panel settings stored as TOML.
pub mod settings;
/// Snapshot store and update queue.
pub mod store;
/// Table, chart and card projections of a snapshot.
pub mod views;
