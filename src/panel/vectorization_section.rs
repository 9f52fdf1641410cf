use eframe::egui;

use super::widgets::{self, muted};
use super::{ConfigPanel, style};
use crate::binder::{FieldSpec, select_output_mode};
use crate::config::OUTPUT_MODE_LIST;

pub const VECTORIZATION_FIELDS: [FieldSpec; 1] = [FieldSpec {
    section: "textVectorizationConfig",
    key: "sequenceLength",
    id: "sequence-length",
    label: "Sequence Length",
}];

impl ConfigPanel {
    pub(super) fn render_vectorization_section(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Text Vectorization")
            .id_salt("text_vectorization_section")
            .default_open(true)
            .show(ui, |ui| {
                let snapshot = self.snapshot();
                widgets::field_grid(
                    ui,
                    "vectorization_fields",
                    &mut self.vectorization_fields,
                    &mut self.store,
                    &snapshot,
                );
                ui.horizontal(|ui| {
                    muted(ui, "Output Mode");
                    let current = snapshot.text_vectorization_config.output_mode;
                    egui::ComboBox::from_id_salt("output_mode_combo")
                        .width(160.0)
                        .selected_text(current.label())
                        .show_ui(ui, |ui| {
                            for mode in OUTPUT_MODE_LIST {
                                let clicked =
                                    ui.selectable_label(mode == current, mode.label()).clicked();
                                if clicked && mode != current {
                                    self.output_mode_error =
                                        select_output_mode(&mut self.store, mode)
                                            .err()
                                            .map(|err| err.to_string());
                                }
                            }
                        });
                });
                if let Some(error) = &self.output_mode_error {
                    ui.label(
                        egui::RichText::new(error)
                            .small()
                            .color(style::palette().warning),
                    );
                }
            });
    }
}
