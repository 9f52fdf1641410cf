//! Bindings between single leaves of the tree and editable widgets.
//!
//! Leaves are described statically by [`Leaf`] descriptors, so a typed binder
//! can only point at a field that exists. Views that wire fields by
//! `(section, key)` strings go through [`FieldBinder::from_spec`], which fails
//! with [`MissingKeyError`] when the panel is built rather than when a widget
//! is first drawn.
//!
//! Every successful edit deep-copies the current tree, overwrites exactly one
//! leaf and proposes the whole tree back to the store.

use std::fmt::Display;
use std::str::FromStr;

use crate::config::{ConfigurationTree, OutputMode};
use crate::error::{ConfigValidationError, FieldError, MissingKeyError};
use crate::store::{ConfigStore, Snapshot};

/// Static accessor pair for one leaf of the tree.
pub struct Leaf<T> {
    pub section: &'static str,
    pub key: &'static str,
    get: fn(&ConfigurationTree) -> &T,
    get_mut: fn(&mut ConfigurationTree) -> &mut T,
}

impl<T> Clone for Leaf<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Leaf<T> {}

impl<T> std::fmt::Debug for Leaf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Leaf({}.{})", self.section, self.key)
    }
}

impl<T> Leaf<T> {
    pub fn path(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }

    pub fn get<'a>(&self, tree: &'a ConfigurationTree) -> &'a T {
        (self.get)(tree)
    }

    pub fn set(&self, tree: &mut ConfigurationTree, value: T) {
        *(self.get_mut)(tree) = value;
    }
}

macro_rules! leaf {
    ($name:ident, $ty:ty, $section:literal, $key:literal, $($field:ident).+) => {
        pub const $name: Leaf<$ty> = Leaf {
            section: $section,
            key: $key,
            get: {
                fn get(tree: &ConfigurationTree) -> &$ty {
                    &tree.$($field).+
                }
                get
            },
            get_mut: {
                fn get_mut(tree: &mut ConfigurationTree) -> &mut $ty {
                    &mut tree.$($field).+
                }
                get_mut
            },
        };
    };
}

/// Editable leaves of the configuration tree.
pub mod leaves {
    use super::Leaf;
    use crate::config::ConfigurationTree;

    leaf!(DATA_URL, String, "datasetConfig", "dataUrl", dataset_config.data_url);
    leaf!(
        DATASET_TARGET_DIR,
        String,
        "datasetConfig",
        "datasetTargetDir",
        dataset_config.dataset_target_dir
    );
    leaf!(BATCH_SIZE, u32, "datasetConfig", "batchSize", dataset_config.batch_size);
    leaf!(SEED, u64, "datasetConfig", "seed", dataset_config.seed);
    leaf!(
        SHOULD_CACHE,
        bool,
        "datasetConfig",
        "shouldCache",
        dataset_config.should_cache
    );
    leaf!(
        TRAINING_SET_DIR,
        String,
        "datasetConfig",
        "trainingSetDir",
        dataset_config.training_set_dir
    );
    leaf!(
        TEST_SET_DIR,
        String,
        "datasetConfig",
        "testSetDir",
        dataset_config.test_set_dir
    );
    leaf!(
        SEQUENCE_LENGTH,
        u32,
        "textVectorizationConfig",
        "sequenceLength",
        text_vectorization_config.sequence_length
    );
    leaf!(
        TRANSLATION_REQUEST,
        String,
        "textVectorizationConfig",
        "translationRequest.token",
        text_vectorization_config.translation_request.token
    );
    leaf!(
        EMBEDDING_DIM,
        u32,
        "modelConfig",
        "embeddingDim",
        model_config.embedding_dim
    );
    leaf!(
        SHOW_SUMMARY,
        bool,
        "modelConfig",
        "showSummary",
        model_config.show_summary
    );
    leaf!(MODEL_NAME, String, "modelConfig", "modelName", model_config.model_name);
    leaf!(EPOCHS, u32, "trainingConfig", "epochs", training_config.epochs);
    leaf!(
        MAX_FEATURES,
        u32,
        "trainingConfig",
        "maxFeatures",
        training_config.max_features
    );
}

/// A leaf of any supported kind, as returned by path lookup.
#[derive(Debug, Clone, Copy)]
pub enum AnyLeaf {
    Text(Leaf<String>),
    Count(Leaf<u32>),
    Seed(Leaf<u64>),
    Toggle(Leaf<bool>),
}

/// Widget shape used to edit a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Text,
    Number,
    Toggle,
}

impl AnyLeaf {
    pub fn section(self) -> &'static str {
        match self {
            Self::Text(leaf) => leaf.section,
            Self::Count(leaf) => leaf.section,
            Self::Seed(leaf) => leaf.section,
            Self::Toggle(leaf) => leaf.section,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Text(leaf) => leaf.key,
            Self::Count(leaf) => leaf.key,
            Self::Seed(leaf) => leaf.key,
            Self::Toggle(leaf) => leaf.key,
        }
    }

    pub fn kind(self) -> WidgetKind {
        match self {
            Self::Text(_) => WidgetKind::Text,
            Self::Count(_) | Self::Seed(_) => WidgetKind::Number,
            Self::Toggle(_) => WidgetKind::Toggle,
        }
    }
}

pub const ALL_LEAVES: [AnyLeaf; 14] = [
    AnyLeaf::Text(leaves::DATA_URL),
    AnyLeaf::Text(leaves::DATASET_TARGET_DIR),
    AnyLeaf::Count(leaves::BATCH_SIZE),
    AnyLeaf::Seed(leaves::SEED),
    AnyLeaf::Toggle(leaves::SHOULD_CACHE),
    AnyLeaf::Text(leaves::TRAINING_SET_DIR),
    AnyLeaf::Text(leaves::TEST_SET_DIR),
    AnyLeaf::Count(leaves::SEQUENCE_LENGTH),
    AnyLeaf::Text(leaves::TRANSLATION_REQUEST),
    AnyLeaf::Count(leaves::EMBEDDING_DIM),
    AnyLeaf::Toggle(leaves::SHOW_SUMMARY),
    AnyLeaf::Text(leaves::MODEL_NAME),
    AnyLeaf::Count(leaves::EPOCHS),
    AnyLeaf::Count(leaves::MAX_FEATURES),
];

/// Resolve a `(section, key)` pair to its leaf descriptor.
pub fn lookup(section: &str, key: &str) -> Result<AnyLeaf, MissingKeyError> {
    ALL_LEAVES
        .iter()
        .copied()
        .find(|leaf| leaf.section() == section && leaf.key() == key)
        .ok_or_else(|| MissingKeyError {
            section: section.to_string(),
            key: key.to_string(),
        })
}

/// Binds a string leaf to a text input.
#[derive(Debug)]
pub struct TextBinder {
    leaf: Leaf<String>,
    label: &'static str,
    error: Option<FieldError>,
}

impl TextBinder {
    pub fn new(leaf: Leaf<String>, label: &'static str) -> Self {
        Self {
            leaf,
            label,
            error: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn current<'a>(&self, snapshot: &'a Snapshot) -> &'a str {
        self.leaf.get(snapshot)
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    /// Write `value` verbatim into the leaf. Returns whether the tree changed.
    pub fn commit(&mut self, store: &mut ConfigStore, value: String) -> bool {
        let leaf = self.leaf;
        match store.update(|tree| leaf.set(tree, value)) {
            Ok(_) => {
                self.error = None;
                true
            }
            Err(err) => {
                self.error = Some(err.into());
                false
            }
        }
    }
}

/// Numeric leaf types a [`NumberBinder`] can edit.
pub trait NumericLeaf: Copy + Display + FromStr + 'static {
    /// One step up or down, saturating at the type's bounds.
    fn stepped(self, up: bool) -> Self;
}

impl NumericLeaf for u32 {
    fn stepped(self, up: bool) -> Self {
        if up {
            self.saturating_add(1)
        } else {
            self.saturating_sub(1)
        }
    }
}

impl NumericLeaf for u64 {
    fn stepped(self, up: bool) -> Self {
        if up {
            self.saturating_add(1)
        } else {
            self.saturating_sub(1)
        }
    }
}

/// Binds a numeric leaf to a text input, parsing on every edit.
///
/// Text that does not parse, or a value the store rejects, is kept as a local
/// draft with an error; the tree keeps its last valid value.
#[derive(Debug)]
pub struct NumberBinder<N: NumericLeaf> {
    leaf: Leaf<N>,
    label: &'static str,
    draft: Option<String>,
    error: Option<FieldError>,
}

impl<N: NumericLeaf> NumberBinder<N> {
    pub fn new(leaf: Leaf<N>, label: &'static str) -> Self {
        Self {
            leaf,
            label,
            draft: None,
            error: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self, snapshot: &Snapshot) -> N {
        *self.leaf.get(snapshot)
    }

    /// Text to show in the widget: the pending draft, or the stored value.
    pub fn display_text(&self, snapshot: &Snapshot) -> String {
        self.draft
            .clone()
            .unwrap_or_else(|| self.leaf.get(snapshot).to_string())
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    /// Drop any pending draft and error.
    pub fn reset(&mut self) {
        self.draft = None;
        self.error = None;
    }

    /// Propose the stored value moved by one step.
    pub fn step(&mut self, store: &mut ConfigStore, up: bool) -> bool {
        let next = self.value(&store.read()).stepped(up);
        self.commit(store, &next.to_string())
    }

    /// Parse `raw` and propose it. Returns whether the tree changed.
    pub fn commit(&mut self, store: &mut ConfigStore, raw: &str) -> bool {
        let Ok(value) = raw.trim().parse::<N>() else {
            self.draft = Some(raw.to_string());
            self.error = Some(FieldError::NotANumber {
                raw: raw.to_string(),
            });
            return false;
        };
        let leaf = self.leaf;
        match store.update(|tree| leaf.set(tree, value)) {
            Ok(_) => {
                self.reset();
                true
            }
            Err(err) => {
                self.draft = Some(raw.to_string());
                self.error = Some(err.into());
                false
            }
        }
    }
}

/// Binds a boolean leaf to a checkbox.
#[derive(Debug)]
pub struct ToggleBinder {
    leaf: Leaf<bool>,
    label: &'static str,
}

impl ToggleBinder {
    pub fn new(leaf: Leaf<bool>, label: &'static str) -> Self {
        Self { leaf, label }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self, snapshot: &Snapshot) -> bool {
        *self.leaf.get(snapshot)
    }

    pub fn commit(&self, store: &mut ConfigStore, value: bool) -> bool {
        let leaf = self.leaf;
        store.update(|tree| leaf.set(tree, value)).is_ok()
    }
}

/// Write `outputMode` and `outputModeIndex` together in one proposal.
pub fn select_output_mode(
    store: &mut ConfigStore,
    mode: OutputMode,
) -> Result<u64, ConfigValidationError> {
    store.update(|tree| {
        tree.text_vectorization_config.output_mode = mode;
        tree.text_vectorization_config.output_mode_index = mode.index();
    })
}

/// Declarative description of one input, as listed by a section view.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub section: &'static str,
    pub key: &'static str,
    pub id: &'static str,
    pub label: &'static str,
}

/// A binder of whichever kind the leaf at a [`FieldSpec`] path requires.
#[derive(Debug)]
pub enum FieldBinder {
    Text(TextBinder),
    Count(NumberBinder<u32>),
    Seed(NumberBinder<u64>),
    Toggle(ToggleBinder),
}

/// A field description paired with the binder built for it.
#[derive(Debug)]
pub struct BoundField {
    pub spec: FieldSpec,
    pub binder: FieldBinder,
}

/// Build binders for every field, failing on the first unknown path.
pub fn bind_all(specs: &[FieldSpec]) -> Result<Vec<BoundField>, MissingKeyError> {
    specs
        .iter()
        .map(|spec| {
            Ok(BoundField {
                spec: *spec,
                binder: FieldBinder::from_spec(spec)?,
            })
        })
        .collect()
}

impl FieldBinder {
    pub fn from_spec(spec: &FieldSpec) -> Result<Self, MissingKeyError> {
        Ok(match lookup(spec.section, spec.key)? {
            AnyLeaf::Text(leaf) => Self::Text(TextBinder::new(leaf, spec.label)),
            AnyLeaf::Count(leaf) => Self::Count(NumberBinder::new(leaf, spec.label)),
            AnyLeaf::Seed(leaf) => Self::Seed(NumberBinder::new(leaf, spec.label)),
            AnyLeaf::Toggle(leaf) => Self::Toggle(ToggleBinder::new(leaf, spec.label)),
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text(binder) => binder.label(),
            Self::Count(binder) => binder.label(),
            Self::Seed(binder) => binder.label(),
            Self::Toggle(binder) => binder.label(),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Text(_) => WidgetKind::Text,
            Self::Count(_) | Self::Seed(_) => WidgetKind::Number,
            Self::Toggle(_) => WidgetKind::Toggle,
        }
    }

    pub fn error(&self) -> Option<&FieldError> {
        match self {
            Self::Text(binder) => binder.error(),
            Self::Count(binder) => binder.error(),
            Self::Seed(binder) => binder.error(),
            Self::Toggle(_) => None,
        }
    }
}
