use super::types::{
    ConfigurationTree, DatasetConfig, DatasetInfo, History, ModelConfig, ModelEvaluation,
    OutputMode, RawTrainSample, TextVectorizationConfig, TrainingConfig, TranslationRequest,
    VectorizedSample,
};

pub const DEFAULT_BATCH_SIZE: u32 = 32;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_SEQUENCE_LENGTH: u32 = 250;
pub const DEFAULT_EMBEDDING_DIM: u32 = 16;
pub const DEFAULT_EPOCHS: u32 = 4;
pub const DEFAULT_MAX_FEATURES: u32 = 10_000;
pub const DEFAULT_MODEL_NAME: &str = "text-classifier-model";

impl Default for ConfigurationTree {
    fn default() -> Self {
        Self {
            dataset_config: DatasetConfig::default(),
            dataset_info: DatasetInfo::default(),
            text_vectorization_config: TextVectorizationConfig::default(),
            model_config: ModelConfig::default(),
            training_config: TrainingConfig::default(),
            model_evaluation: ModelEvaluation::default(),
            plot_uri: Vec::new(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_url: String::new(),
            dataset_target_dir: ".".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            seed: DEFAULT_SEED,
            should_cache: true,
            training_set_dir: "aclImdb/train".to_string(),
            test_set_dir: "aclImdb/test".to_string(),
        }
    }
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self {
            raw_train_sample: RawTrainSample::default(),
            vectorized_sample: VectorizedSample::default(),
            vocab_int_value: 0,
            vocab_translation: String::new(),
        }
    }
}

impl Default for VectorizedSample {
    fn default() -> Self {
        Self {
            sample_raw: "placeholder sample".to_string(),
            sample_vectorized: "09 90 1 1 0 0 12".to_string(),
        }
    }
}

impl Default for TextVectorizationConfig {
    fn default() -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            output_mode: OutputMode::Int,
            output_mode_index: 0,
            token_chips: Vec::new(),
            translation_request: TranslationRequest::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            show_summary: false,
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl Default for ModelEvaluation {
    fn default() -> Self {
        Self {
            loss: 0.0,
            accuracy: 0.0,
            history: History::default(),
        }
    }
}
