use eframe::egui::{self, RichText};

use super::widgets::{self, muted, section_label};
use super::{ConfigPanel, style};
use crate::binder::FieldSpec;

pub const DATASET_FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        section: "datasetConfig",
        key: "datasetTargetDir",
        id: "dataset-target-dir",
        label: "Dataset Src Dir",
    },
    FieldSpec {
        section: "datasetConfig",
        key: "trainingSetDir",
        id: "training-set-dir",
        label: "Dataset Training Directory",
    },
    FieldSpec {
        section: "datasetConfig",
        key: "testSetDir",
        id: "test-set-dir",
        label: "Dataset Test Directory",
    },
    FieldSpec {
        section: "datasetConfig",
        key: "batchSize",
        id: "batch-size",
        label: "Batch Size",
    },
    FieldSpec {
        section: "datasetConfig",
        key: "seed",
        id: "seed",
        label: "Seed",
    },
    FieldSpec {
        section: "datasetConfig",
        key: "shouldCache",
        id: "should-cache",
        label: "Should Cache",
    },
    FieldSpec {
        section: "datasetConfig",
        key: "dataUrl",
        id: "data-url",
        label: "Data URL",
    },
];

impl ConfigPanel {
    pub(super) fn render_dataset_section(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Data Input")
            .id_salt("data_input_section")
            .default_open(true)
            .show(ui, |ui| {
                let snapshot = self.snapshot();
                widgets::field_grid(
                    ui,
                    "dataset_fields",
                    &mut self.dataset_fields,
                    &mut self.store,
                    &snapshot,
                );
                ui.add_space(8.0);
                ui.separator();
                self.render_data_info(ui);
            });
    }

    fn render_data_info(&mut self, ui: &mut egui::Ui) {
        section_label(ui, "Data Info");
        self.refresh_views();
        self.render_sample_table(ui);
        ui.add_space(6.0);
        self.render_vectorization_preview(ui);
        ui.add_space(6.0);
        self.render_token_translation(ui);
    }

    fn render_sample_table(&self, ui: &mut egui::Ui) {
        let table = self.views.table();
        if table.rows.is_empty() {
            muted(ui, "No training sample yet.");
            return;
        }
        egui::Grid::new("raw_train_sample")
            .num_columns(2)
            .striped(true)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("label").strong());
                ui.label(RichText::new("review").strong());
                ui.end_row();
                for row in &table.rows {
                    ui.label(row.label.to_string());
                    ui.add(egui::Label::new(row.text.as_str()).wrap());
                    ui.end_row();
                }
            });
        if let Some(alignment) = &table.alignment {
            ui.label(
                RichText::new(format!("Showing aligned rows only: {alignment}"))
                    .small()
                    .color(style::palette().warning),
            );
        }
    }

    fn render_vectorization_preview(&self, ui: &mut egui::Ui) {
        let preview = self.views.preview();
        egui::Grid::new("vectorization_preview")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                muted(ui, "Raw sample");
                ui.add(egui::Label::new(preview.raw.as_str()).wrap());
                ui.end_row();
                muted(ui, "Vectorized sample");
                ui.monospace(preview.vectorized.as_str());
                ui.end_row();
                muted(ui, "Vocabulary lookup");
                ui.monospace(format!(
                    "{} -> {}",
                    preview.vocab_int_value, preview.vocab_translation
                ));
                ui.end_row();
            });
    }
}
