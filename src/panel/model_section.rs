use eframe::egui::{self, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use super::widgets::{self, muted, section_label};
use super::{ConfigPanel, style};
use crate::binder::FieldSpec;
use crate::views::LineChartSpec;

pub const MODEL_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        section: "modelConfig",
        key: "embeddingDim",
        id: "embedding-dim",
        label: "Embedding Dimension",
    },
    FieldSpec {
        section: "modelConfig",
        key: "modelName",
        id: "model-name",
        label: "Model Name",
    },
    FieldSpec {
        section: "trainingConfig",
        key: "epochs",
        id: "epochs",
        label: "Epochs",
    },
    FieldSpec {
        section: "trainingConfig",
        key: "maxFeatures",
        id: "max-features",
        label: "Max Features",
    },
    FieldSpec {
        section: "modelConfig",
        key: "showSummary",
        id: "show-summary",
        label: "Show Summary",
    },
];

/// Tabs of the model section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelTab {
    #[default]
    TrainingAndEvaluation,
    Prediction,
}

impl ModelTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::TrainingAndEvaluation => "Training & Evaluation",
            Self::Prediction => "Prediction",
        }
    }
}

const CHART_HEIGHT: f32 = 220.0;

impl ConfigPanel {
    pub(super) fn render_model_section(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Model and Training Configuration")
            .id_salt("model_training_section")
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for tab in [ModelTab::TrainingAndEvaluation, ModelTab::Prediction] {
                        ui.selectable_value(&mut self.model_tab, tab, tab.label());
                    }
                });
                ui.separator();
                match self.model_tab {
                    ModelTab::TrainingAndEvaluation => self.render_training_tab(ui),
                    ModelTab::Prediction => self.render_prediction_tab(ui),
                }
            });
    }

    fn render_training_tab(&mut self, ui: &mut egui::Ui) {
        let snapshot = self.snapshot();
        widgets::field_grid(
            ui,
            "model_fields",
            &mut self.model_fields,
            &mut self.store,
            &snapshot,
        );
        ui.add_space(8.0);
        self.refresh_views();
        if let Some(chart) = self.views.chart() {
            eval_chart(ui, chart);
        }
    }

    fn render_prediction_tab(&mut self, ui: &mut egui::Ui) {
        self.refresh_views();
        let Some(cards) = self.views.cards() else {
            return;
        };
        ui.horizontal(|ui| {
            for card in cards {
                widgets::stat_card(ui, card.title, &card.stat);
            }
        });
    }
}

fn eval_chart(ui: &mut egui::Ui, chart: &LineChartSpec) {
    section_label(ui, chart.title);
    if chart.is_empty() {
        muted(ui, "No training history yet.");
    }
    if let Some(alignment) = &chart.alignment {
        ui.label(
            RichText::new(alignment.to_string())
                .small()
                .color(style::palette().warning),
        );
    }
    Plot::new("eval_results_plot")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .x_axis_label("epoch")
        .show(ui, |plot_ui| {
            for series in &chart.series {
                plot_ui.line(
                    Line::new(series.name(), PlotPoints::from(series.points()))
                        .color(series.color),
                );
            }
        });
}
