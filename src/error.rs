//! Error taxonomy shared by the store, binders and derived views.
//!
//! Validation and alignment failures stay local to the widget or view that
//! triggered them; only wiring mistakes (`MissingKeyError`) are treated as
//! fatal, and those surface at construction time.

use thiserror::Error;

/// A proposed configuration tree failed shape or type validation.
///
/// The update is rejected and the previous snapshot stays current.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// The payload is missing a section or key, or a leaf has the wrong type.
    #[error("Malformed configuration: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
    /// Two token chips share the same deletion key.
    #[error("Duplicate token chip key {key}")]
    DuplicateChipKey { key: u64 },
    /// A numeric leaf is below its minimum.
    #[error("{path} must be at least {min}, got {value}")]
    OutOfRange {
        path: &'static str,
        min: u64,
        value: u64,
    },
    /// `outputModeIndex` does not point at `outputMode`.
    #[error("Output mode {mode} does not sit at index {index}")]
    OutputModeMismatch { mode: &'static str, index: usize },
}

/// Two sequences that should be row-aligned have different lengths.
///
/// Derived views report this next to their truncated output instead of
/// failing the panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} is misaligned ({left} vs {right})")]
pub struct AlignmentError {
    pub what: &'static str,
    pub left: usize,
    pub right: usize,
}

/// A binder was wired to a path that is not part of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No configuration leaf at {section}.{key}")]
pub struct MissingKeyError {
    pub section: String,
    pub key: String,
}

/// Local, non-propagating failure of a single field edit.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The widget text could not be parsed as a number.
    #[error("\"{raw}\" is not a valid number")]
    NotANumber { raw: String },
    /// The edited tree was rejected by the store.
    #[error(transparent)]
    Rejected(#[from] ConfigValidationError),
}

/// One item of a translation request that is not an integer token id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{item}\" is not a token id")]
pub struct InvalidTokenError {
    pub item: String,
}
