use serde::{Deserialize, Serialize};

/// The single nested configuration tree shared by every section of the panel.
///
/// Every section and leaf is required when decoding a host payload; unknown
/// keys are ignored so UI-only extras written by older hosts still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationTree {
    pub dataset_config: DatasetConfig,
    pub dataset_info: DatasetInfo,
    pub text_vectorization_config: TextVectorizationConfig,
    pub model_config: ModelConfig,
    pub training_config: TrainingConfig,
    pub model_evaluation: ModelEvaluation,
    /// Opaque plot references; kept for host compatibility, never rendered.
    pub plot_uri: Vec<String>,
}

/// Where the dataset lives and how batches are drawn from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    pub data_url: String,
    pub dataset_target_dir: String,
    pub batch_size: u32,
    pub seed: u64,
    pub should_cache: bool,
    pub training_set_dir: String,
    pub test_set_dir: String,
}

/// Preview data published by the computation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub raw_train_sample: RawTrainSample,
    pub vectorized_sample: VectorizedSample,
    pub vocab_int_value: i64,
    pub vocab_translation: String,
}

/// Row-aligned text and label batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrainSample {
    pub text_batch: Vec<String>,
    pub label_batch: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorizedSample {
    pub sample_raw: String,
    pub sample_vectorized: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextVectorizationConfig {
    pub sequence_length: u32,
    pub output_mode: OutputMode,
    pub output_mode_index: usize,
    pub token_chips: Vec<TokenChip>,
    pub translation_request: TranslationRequest,
}

/// Output encodings supported by the text vectorization layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Int,
    MultiHot,
    Count,
    TfIdf,
}

pub const OUTPUT_MODE_LIST: [OutputMode; 4] = [
    OutputMode::Int,
    OutputMode::MultiHot,
    OutputMode::Count,
    OutputMode::TfIdf,
];

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::MultiHot => "multi_hot",
            Self::Count => "count",
            Self::TfIdf => "tf_idf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Int => "Integer ids",
            Self::MultiHot => "Multi-hot",
            Self::Count => "Token counts",
            Self::TfIdf => "TF-IDF",
        }
    }

    /// Position of this mode in [`OUTPUT_MODE_LIST`].
    pub fn index(self) -> usize {
        OUTPUT_MODE_LIST
            .iter()
            .position(|mode| *mode == self)
            .unwrap_or_default()
    }
}

/// A translated token shown as a removable chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenChip {
    /// Vocabulary id the engine translated.
    pub token: u32,
    pub translation: String,
    /// Deletion identity; unique within `tokenChips`.
    pub key: u64,
}

impl TokenChip {
    pub fn label(&self) -> String {
        format!("{}:{}", self.token, self.translation)
    }
}

/// Raw token request, forwarded verbatim to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub embedding_dim: u32,
    pub show_summary: bool,
    pub model_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingConfig {
    pub epochs: u32,
    pub max_features: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEvaluation {
    pub loss: f64,
    pub accuracy: f64,
    pub history: History,
}

/// Per-epoch metric series; index `i` is epoch `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub training_loss: Vec<f64>,
    pub training_binary_accuracy: Vec<f64>,
    pub validation_loss: Vec<f64>,
    pub validation_binary_accuracy: Vec<f64>,
}

/// Names of the history series in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryMetric {
    TrainingLoss,
    TrainingBinaryAccuracy,
    ValidationLoss,
    ValidationBinaryAccuracy,
}

pub const HISTORY_METRIC_LIST: [HistoryMetric; 4] = [
    HistoryMetric::TrainingLoss,
    HistoryMetric::TrainingBinaryAccuracy,
    HistoryMetric::ValidationLoss,
    HistoryMetric::ValidationBinaryAccuracy,
];

impl HistoryMetric {
    pub fn key(self) -> &'static str {
        match self {
            Self::TrainingLoss => "trainingLoss",
            Self::TrainingBinaryAccuracy => "trainingBinaryAccuracy",
            Self::ValidationLoss => "validationLoss",
            Self::ValidationBinaryAccuracy => "validationBinaryAccuracy",
        }
    }
}

impl History {
    pub fn series(&self, metric: HistoryMetric) -> &[f64] {
        match metric {
            HistoryMetric::TrainingLoss => &self.training_loss,
            HistoryMetric::TrainingBinaryAccuracy => &self.training_binary_accuracy,
            HistoryMetric::ValidationLoss => &self.validation_loss,
            HistoryMetric::ValidationBinaryAccuracy => &self.validation_binary_accuracy,
        }
    }

    pub fn is_empty(&self) -> bool {
        HISTORY_METRIC_LIST
            .iter()
            .all(|metric| self.series(*metric).is_empty())
    }
}
