//! Typed schema for the shared configuration tree.
//!
//! Host payloads are decoded strictly: a missing section or leaf is a
//! [`ConfigValidationError::Malformed`]. Decoded trees are then checked for
//! the invariants the panel relies on (unique chip keys, positive sizes,
//! consistent output mode).

mod defaults;
mod types;

pub use defaults::*;
pub use types::*;

use std::collections::HashSet;

use crate::error::ConfigValidationError;

impl ConfigurationTree {
    /// Decode a tree from a host JSON value and validate it.
    ///
    /// Chips written by the engine carry no `key`; those get their position
    /// in `tokenChips` before decoding.
    pub fn from_value(mut value: serde_json::Value) -> Result<Self, ConfigValidationError> {
        key_chips_by_position(&mut value);
        let tree: Self = serde_json::from_value(value)
            .map_err(|source| ConfigValidationError::Malformed { source })?;
        tree.validate()?;
        Ok(tree)
    }

    pub fn to_value(&self) -> serde_json::Value {
        // Every field is a plain string, number, bool or sequence, so this cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Check the invariants a proposed tree must satisfy before it is installed.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_min(
            "datasetConfig.batchSize",
            1,
            self.dataset_config.batch_size.into(),
        )?;
        check_min(
            "textVectorizationConfig.sequenceLength",
            1,
            self.text_vectorization_config.sequence_length.into(),
        )?;
        check_min(
            "modelConfig.embeddingDim",
            1,
            self.model_config.embedding_dim.into(),
        )?;
        check_min("trainingConfig.epochs", 1, self.training_config.epochs.into())?;
        check_min(
            "trainingConfig.maxFeatures",
            1,
            self.training_config.max_features.into(),
        )?;

        let vectorization = &self.text_vectorization_config;
        if vectorization.output_mode.index() != vectorization.output_mode_index {
            return Err(ConfigValidationError::OutputModeMismatch {
                mode: vectorization.output_mode.as_str(),
                index: vectorization.output_mode_index,
            });
        }

        let mut seen = HashSet::with_capacity(vectorization.token_chips.len());
        for chip in &vectorization.token_chips {
            if !seen.insert(chip.key) {
                return Err(ConfigValidationError::DuplicateChipKey { key: chip.key });
            }
        }
        Ok(())
    }
}

fn key_chips_by_position(value: &mut serde_json::Value) {
    let Some(chips) = value
        .pointer_mut("/textVectorizationConfig/tokenChips")
        .and_then(serde_json::Value::as_array_mut)
    else {
        return;
    };
    for (position, chip) in chips.iter_mut().enumerate() {
        if let Some(chip) = chip.as_object_mut() {
            chip.entry("key").or_insert_with(|| position.into());
        }
    }
}

fn check_min(path: &'static str, min: u64, value: u64) -> Result<(), ConfigValidationError> {
    if value < min {
        return Err(ConfigValidationError::OutOfRange { path, min, value });
    }
    Ok(())
}
