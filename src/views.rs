//! Pure projections from snapshots into renderable view structs.
//!
//! Nothing here touches the store. [`DerivedViews`] caches the projections of
//! one snapshot and recomputes them whenever the store revision moves; every
//! accepted proposal bumps the revision, so stale nested data cannot survive
//! a replace.

use egui::Color32;
use tracing::warn;

use crate::config::{
    HISTORY_METRIC_LIST, History, HistoryMetric, ModelEvaluation, RawTrainSample, TokenChip,
};
use crate::error::AlignmentError;
use crate::store::Snapshot;

pub const CHART_TITLE: &str = "Eval Results";

/// One label/review row of the sample table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: i64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub rows: Vec<TableRow>,
    /// Set when the batches differed in length and rows were dropped.
    pub alignment: Option<AlignmentError>,
}

/// Zip texts with labels, truncating to the shorter batch.
pub fn data_table(sample: &RawTrainSample) -> DataTable {
    let rows = sample
        .text_batch
        .iter()
        .zip(sample.label_batch.iter())
        .map(|(text, label)| TableRow {
            label: *label,
            text: text.clone(),
        })
        .collect();
    let alignment = (sample.text_batch.len() != sample.label_batch.len()).then(|| AlignmentError {
        what: "rawTrainSample",
        left: sample.text_batch.len(),
        right: sample.label_batch.len(),
    });
    DataTable { rows, alignment }
}

/// One line of the training chart; `x[i]` is the 1-based epoch of `y[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub metric: HistoryMetric,
    pub color: Color32,
    pub x: Vec<u32>,
    pub y: Vec<f64>,
}

impl ChartSeries {
    pub fn name(&self) -> &'static str {
        self.metric.key()
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(x, y)| [f64::from(*x), *y])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartSpec {
    pub title: &'static str,
    /// Epoch labels for the longest series.
    pub labels: Vec<u32>,
    pub series: Vec<ChartSeries>,
    pub alignment: Option<AlignmentError>,
}

impl LineChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.y.is_empty())
    }
}

pub fn series_color(metric: HistoryMetric) -> Color32 {
    match metric {
        HistoryMetric::TrainingLoss => Color32::from_rgb(255, 99, 132),
        HistoryMetric::TrainingBinaryAccuracy => Color32::from_rgb(127, 255, 212),
        HistoryMetric::ValidationLoss => Color32::from_rgb(195, 165, 122),
        HistoryMetric::ValidationBinaryAccuracy => Color32::from_rgb(167, 217, 255),
    }
}

/// One series per history metric, in schema order.
///
/// Empty history yields empty series. Series of different lengths each keep
/// their own length; the mismatch is reported in `alignment`.
pub fn line_chart(history: &History) -> LineChartSpec {
    let series: Vec<ChartSeries> = HISTORY_METRIC_LIST
        .iter()
        .map(|metric| {
            let data = history.series(*metric);
            ChartSeries {
                metric: *metric,
                color: series_color(*metric),
                x: epoch_labels(data.len()),
                y: data.to_vec(),
            }
        })
        .collect();
    let shortest = series.iter().map(|s| s.y.len()).min().unwrap_or(0);
    let longest = series.iter().map(|s| s.y.len()).max().unwrap_or(0);
    let alignment = (shortest != longest).then(|| AlignmentError {
        what: "history",
        left: shortest,
        right: longest,
    });
    LineChartSpec {
        title: CHART_TITLE,
        labels: epoch_labels(longest),
        series,
        alignment,
    }
}

fn epoch_labels(len: usize) -> Vec<u32> {
    (1..=len as u32).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub stat: String,
}

pub fn stat_cards(evaluation: &ModelEvaluation) -> [StatCard; 2] {
    [
        StatCard {
            title: "loss",
            stat: format!("{:.4}", evaluation.loss),
        },
        StatCard {
            title: "accuracy",
            stat: format!("{:.4}", evaluation.accuracy),
        },
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorizationPreview {
    pub raw: String,
    pub vectorized: String,
    pub vocab_int_value: i64,
    pub vocab_translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    pub key: u64,
    pub label: String,
}

pub fn chip_views(chips: &[TokenChip]) -> Vec<ChipView> {
    chips
        .iter()
        .map(|chip| ChipView {
            key: chip.key,
            label: chip.label(),
        })
        .collect()
}

/// Projections of the most recent snapshot, rebuilt when the revision moves.
#[derive(Debug, Default)]
pub struct DerivedViews {
    revision: Option<u64>,
    table: DataTable,
    chart: Option<LineChartSpec>,
    cards: Option<[StatCard; 2]>,
    preview: VectorizationPreview,
    chips: Vec<ChipView>,
}

impl DerivedViews {
    /// Recompute from `snapshot` if it is newer than what is cached.
    ///
    /// Returns whether anything was recomputed.
    pub fn refresh(&mut self, snapshot: &Snapshot) -> bool {
        if self.revision == Some(snapshot.revision()) {
            return false;
        }
        let info = &snapshot.dataset_info;
        self.table = data_table(&info.raw_train_sample);
        if let Some(err) = &self.table.alignment {
            warn!("Sample table truncated: {err}");
        }
        let chart = line_chart(&snapshot.model_evaluation.history);
        if let Some(err) = &chart.alignment {
            warn!("Training chart series differ in length: {err}");
        }
        self.chart = Some(chart);
        self.cards = Some(stat_cards(&snapshot.model_evaluation));
        self.preview = VectorizationPreview {
            raw: info.vectorized_sample.sample_raw.clone(),
            vectorized: info.vectorized_sample.sample_vectorized.clone(),
            vocab_int_value: info.vocab_int_value,
            vocab_translation: info.vocab_translation.clone(),
        };
        self.chips = chip_views(&snapshot.text_vectorization_config.token_chips);
        self.revision = Some(snapshot.revision());
        true
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn chart(&self) -> Option<&LineChartSpec> {
        self.chart.as_ref()
    }

    pub fn cards(&self) -> Option<&[StatCard; 2]> {
        self.cards.as_ref()
    }

    pub fn preview(&self) -> &VectorizationPreview {
        &self.preview
    }

    pub fn chips(&self) -> &[ChipView] {
        &self.chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConfigStore;

    fn sample(texts: &[&str], labels: &[i64]) -> RawTrainSample {
        RawTrainSample {
            text_batch: texts.iter().map(|t| t.to_string()).collect(),
            label_batch: labels.to_vec(),
        }
    }

    #[test]
    fn table_zips_text_with_labels() {
        let table = data_table(&sample(&["great movie", "bad movie"], &[1, 0]));
        assert_eq!(
            table.rows,
            vec![
                TableRow {
                    label: 1,
                    text: "great movie".to_string()
                },
                TableRow {
                    label: 0,
                    text: "bad movie".to_string()
                },
            ]
        );
        assert!(table.alignment.is_none());
    }

    #[test]
    fn table_truncates_to_shorter_batch() {
        let table = data_table(&sample(&["a", "b", "c"], &[1, 0]));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.alignment,
            Some(AlignmentError {
                what: "rawTrainSample",
                left: 3,
                right: 2
            })
        );
    }

    #[test]
    fn chart_emits_one_series_per_metric_with_epoch_x() {
        let history = History {
            training_loss: vec![0.9, 0.5],
            training_binary_accuracy: vec![0.5, 0.7],
            validation_loss: vec![1.0, 0.6],
            validation_binary_accuracy: vec![0.4, 0.65],
        };
        let chart = line_chart(&history);
        assert_eq!(chart.series.len(), 4);
        for series in &chart.series {
            assert_eq!(series.x, vec![1, 2]);
        }
        assert_eq!(chart.series[0].name(), "trainingLoss");
        assert_eq!(chart.series[0].y, vec![0.9, 0.5]);
        assert_eq!(chart.series[1].y, vec![0.5, 0.7]);
        assert_eq!(chart.series[2].y, vec![1.0, 0.6]);
        assert_eq!(chart.series[3].y, vec![0.4, 0.65]);
        assert_eq!(chart.series[3].points(), vec![[1.0, 0.4], [2.0, 0.65]]);
        assert_eq!(chart.labels, vec![1, 2]);
        assert!(chart.alignment.is_none());
    }

    #[test]
    fn empty_history_is_an_empty_plot() {
        let chart = line_chart(&History::default());
        assert_eq!(chart.series.len(), 4);
        assert!(chart.is_empty());
        assert!(chart.labels.is_empty());
        assert!(chart.alignment.is_none());
    }

    #[test]
    fn ragged_history_keeps_each_series_length() {
        let history = History {
            training_loss: vec![0.9, 0.5, 0.4],
            training_binary_accuracy: vec![0.5],
            ..History::default()
        };
        let chart = line_chart(&history);
        assert_eq!(chart.series[0].x, vec![1, 2, 3]);
        assert_eq!(chart.series[1].x, vec![1]);
        assert_eq!(chart.labels, vec![1, 2, 3]);
        assert!(chart.alignment.is_some());
    }

    #[test]
    fn chip_views_join_token_and_translation() {
        let chips = [TokenChip {
            token: 12,
            translation: "movie".to_string(),
            key: 3,
        }];
        assert_eq!(
            chip_views(&chips),
            vec![ChipView {
                key: 3,
                label: "12:movie".to_string()
            }]
        );
    }

    #[test]
    fn cache_recomputes_only_on_new_revision() {
        let mut store = ConfigStore::default();
        let mut views = DerivedViews::default();
        assert!(views.refresh(&store.read()));
        assert!(!views.refresh(&store.read()));
        assert!(views.table().rows.is_empty());

        store
            .update(|tree| {
                tree.dataset_info.raw_train_sample = RawTrainSample {
                    text_batch: vec!["fine".to_string()],
                    label_batch: vec![1],
                };
                tree.model_evaluation.loss = 0.25;
            })
            .unwrap();
        assert!(views.refresh(&store.read()));
        assert_eq!(views.table().rows.len(), 1);
        assert_eq!(views.cards().unwrap()[0].stat, "0.2500");
        assert_eq!(views.revision(), Some(1));
    }
}
