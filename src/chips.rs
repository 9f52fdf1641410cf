//! Token chip management: removable translation chips and the raw request.

use tracing::debug;

use crate::config::TokenChip;
use crate::error::ConfigValidationError;
use crate::store::ConfigStore;

/// Every chip whose key differs from `key`, keeping their order.
pub fn without_chip(chips: &[TokenChip], key: u64) -> Vec<TokenChip> {
    chips
        .iter()
        .filter(|chip| chip.key != key)
        .cloned()
        .collect()
}

/// Remove the chip identified by `key`.
///
/// Returns `Ok(false)` without proposing when no chip has that key, so
/// repeated deletes are harmless.
pub fn delete_chip(store: &mut ConfigStore, key: u64) -> Result<bool, ConfigValidationError> {
    let snapshot = store.read();
    let chips = &snapshot.text_vectorization_config.token_chips;
    if !chips.iter().any(|chip| chip.key == key) {
        debug!(key, "Token chip already absent");
        return Ok(false);
    }
    let remaining = without_chip(chips, key);
    let mut next = snapshot.to_tree();
    next.text_vectorization_config.token_chips = remaining;
    store.propose(next)?;
    Ok(true)
}

/// Store the request text verbatim; the engine parses it on its next run.
pub fn request_translation(
    store: &mut ConfigStore,
    raw: &str,
) -> Result<u64, ConfigValidationError> {
    let raw = raw.to_string();
    store.update(|tree| tree.text_vectorization_config.translation_request.token = raw)
}
