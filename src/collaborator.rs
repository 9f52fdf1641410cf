//! Write-back helpers for the engine that trains and evaluates the model.
//!
//! Each `apply_*` function builds the next tree from the current snapshot and
//! proposes it whole. Engine code running off the UI thread uses the `set_*`
//! edits with an [`UpdateSender`](crate::store::UpdateSender) instead:
//!
//! ```
//! # use classifier_panel::{collaborator, store::ConfigStore};
//! let mut store = ConfigStore::default();
//! let sender = store.update_sender();
//! sender.edit(|tree| collaborator::set_evaluation(tree, 0.31, 0.87));
//! store.drain_pending();
//! assert_eq!(store.read().model_evaluation.accuracy, 0.87);
//! ```

use std::collections::BTreeMap;

use crate::config::{ConfigurationTree, History, TokenChip};
use crate::error::{ConfigValidationError, InvalidTokenError};
use crate::store::ConfigStore;

/// Rows kept from a sample batch for the Data Info table.
pub const PREVIEW_ROWS: usize = 2;

/// Metric names reported by the training loop, in history-series order.
pub const TRAINING_LOSS: &str = "loss";
pub const TRAINING_ACCURACY: &str = "binary_accuracy";
pub const VALIDATION_LOSS: &str = "val_loss";
pub const VALIDATION_ACCURACY: &str = "val_binary_accuracy";

/// Keep the first rows of a sample batch, truncated to equal length.
pub fn set_preview_sample(tree: &mut ConfigurationTree, texts: &[String], labels: &[i64]) {
    let rows = texts.len().min(labels.len()).min(PREVIEW_ROWS);
    let sample = &mut tree.dataset_info.raw_train_sample;
    sample.text_batch = texts[..rows].to_vec();
    sample.label_batch = labels[..rows].to_vec();
}

pub fn apply_preview_sample(
    store: &mut ConfigStore,
    texts: &[String],
    labels: &[i64],
) -> Result<u64, ConfigValidationError> {
    store.update(|tree| set_preview_sample(tree, texts, labels))
}

/// Map a per-epoch metric table onto the four history series.
///
/// Metrics the table does not carry become empty series.
pub fn history_from_metrics(metrics: &BTreeMap<String, Vec<f64>>) -> History {
    let series = |name: &str| metrics.get(name).cloned().unwrap_or_default();
    History {
        training_loss: series(TRAINING_LOSS),
        training_binary_accuracy: series(TRAINING_ACCURACY),
        validation_loss: series(VALIDATION_LOSS),
        validation_binary_accuracy: series(VALIDATION_ACCURACY),
    }
}

pub fn set_training_history(tree: &mut ConfigurationTree, metrics: &BTreeMap<String, Vec<f64>>) {
    tree.model_evaluation.history = history_from_metrics(metrics);
}

pub fn apply_training_history(
    store: &mut ConfigStore,
    metrics: &BTreeMap<String, Vec<f64>>,
) -> Result<u64, ConfigValidationError> {
    store.update(|tree| set_training_history(tree, metrics))
}

pub fn set_evaluation(tree: &mut ConfigurationTree, loss: f64, accuracy: f64) {
    tree.model_evaluation.loss = loss;
    tree.model_evaluation.accuracy = accuracy;
}

pub fn apply_evaluation(
    store: &mut ConfigStore,
    loss: f64,
    accuracy: f64,
) -> Result<u64, ConfigValidationError> {
    store.update(|tree| set_evaluation(tree, loss, accuracy))
}

/// Chips for translated tokens, keyed by position.
pub fn translation_chips(pairs: &[(u32, String)]) -> Vec<TokenChip> {
    pairs
        .iter()
        .zip(0u64..)
        .map(|((token, translation), key)| TokenChip {
            token: *token,
            translation: translation.clone(),
            key,
        })
        .collect()
}

/// Replace every chip with the translated pairs.
pub fn set_token_translations(tree: &mut ConfigurationTree, pairs: &[(u32, String)]) {
    tree.text_vectorization_config.token_chips = translation_chips(pairs);
}

pub fn apply_token_translations(
    store: &mut ConfigStore,
    pairs: &[(u32, String)],
) -> Result<u64, ConfigValidationError> {
    store.update(|tree| set_token_translations(tree, pairs))
}

/// Token ids parsed from a translation request, plus the items that were not ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRequest {
    pub tokens: Vec<u32>,
    pub invalid: Vec<InvalidTokenError>,
}

impl TokenRequest {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Split a raw request on commas; blank items are skipped.
pub fn parse_token_request(raw: &str) -> TokenRequest {
    let mut request = TokenRequest::default();
    for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        match item.parse::<u32>() {
            Ok(token) => request.tokens.push(token),
            Err(_) => request.invalid.push(InvalidTokenError {
                item: item.to_string(),
            }),
        }
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn preview_keeps_two_aligned_rows() {
        let mut store = ConfigStore::default();
        apply_preview_sample(&mut store, &strings(&["a", "b", "c"]), &[1, 0, 1]).unwrap();
        let sample = &store.read().dataset_info.raw_train_sample;
        assert_eq!(sample.text_batch, strings(&["a", "b"]));
        assert_eq!(sample.label_batch, vec![1, 0]);

        apply_preview_sample(&mut store, &strings(&["only"]), &[0, 1]).unwrap();
        let sample = &store.read().dataset_info.raw_train_sample;
        assert_eq!(sample.text_batch.len(), sample.label_batch.len());
        assert_eq!(sample.label_batch, vec![0]);
    }

    #[test]
    fn history_maps_training_metric_names() {
        let mut metrics = BTreeMap::new();
        metrics.insert("loss".to_string(), vec![0.69, 0.5]);
        metrics.insert("binary_accuracy".to_string(), vec![0.6, 0.8]);
        metrics.insert("val_loss".to_string(), vec![0.7, 0.55]);
        metrics.insert("lr".to_string(), vec![0.001, 0.001]);
        let mut store = ConfigStore::default();
        apply_training_history(&mut store, &metrics).unwrap();
        let history = &store.read().model_evaluation.history;
        assert_eq!(history.training_loss, vec![0.69, 0.5]);
        assert_eq!(history.training_binary_accuracy, vec![0.6, 0.8]);
        assert_eq!(history.validation_loss, vec![0.7, 0.55]);
        assert!(history.validation_binary_accuracy.is_empty());
    }

    #[test]
    fn evaluation_overwrites_loss_and_accuracy() {
        let mut store = ConfigStore::default();
        let revision = apply_evaluation(&mut store, 0.3, 0.88).unwrap();
        assert_eq!(revision, 1);
        assert_eq!(store.read().model_evaluation.loss, 0.3);
        assert_eq!(store.read().model_evaluation.accuracy, 0.88);
    }

    #[test]
    fn translations_get_unique_sequential_keys() {
        let mut store = ConfigStore::default();
        let pairs = vec![(12, "movie".to_string()), (40, "great".to_string())];
        apply_token_translations(&mut store, &pairs).unwrap();
        let chips = &store.read().text_vectorization_config.token_chips;
        assert_eq!(chips.len(), 2);
        assert_eq!((chips[0].key, chips[1].key), (0, 1));
        assert_eq!(chips[1].label(), "40:great");
    }

    #[test]
    fn request_parsing_reports_non_integers() {
        let request = parse_token_request(" 12, 40 ,, x ,7");
        assert_eq!(request.tokens, vec![12, 40, 7]);
        assert_eq!(
            request.invalid,
            vec![InvalidTokenError {
                item: "x".to_string()
            }]
        );
        assert!(!request.is_clean());
        assert!(parse_token_request("   ").tokens.is_empty());
        assert!(parse_token_request("").is_clean());
    }

    #[test]
    fn worker_thread_results_land_through_the_queue() {
        let mut store = ConfigStore::default();
        let sender = store.update_sender();
        let worker = std::thread::spawn(move || {
            let pairs = vec![(3, "the".to_string())];
            sender.edit(move |tree| set_token_translations(tree, &pairs));
            sender.edit(|tree| set_evaluation(tree, 0.4, 0.8));
        });
        worker.join().unwrap();
        assert_eq!(store.drain_pending(), 2);
        let snapshot = store.read();
        assert_eq!(snapshot.text_vectorization_config.token_chips[0].label(), "3:the");
        assert_eq!(snapshot.model_evaluation.accuracy, 0.8);
        assert_eq!(snapshot.revision(), 2);
    }
}
