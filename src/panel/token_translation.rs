use eframe::egui::{self, RichText};

use super::widgets::{self, muted, section_label};
use super::{ConfigPanel, style};
use crate::chips;
use crate::collaborator::parse_token_request;

pub const TRANSLATION_PROMPT: &str =
    "Enter a comma separated list of tokens to translate next PREVIEW run.";

impl ConfigPanel {
    pub(super) fn render_token_translation(&mut self, ui: &mut egui::Ui) {
        section_label(ui, "Token Translation");
        let snapshot = self.snapshot();
        muted(ui, TRANSLATION_PROMPT);
        let mut request = snapshot
            .text_vectorization_config
            .translation_request
            .token
            .clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut request)
                .id_salt("translation_request")
                .hint_text("12, 40, 77")
                .desired_width(260.0),
        );
        if response.changed() {
            self.chip_error = chips::request_translation(&mut self.store, &request)
                .err()
                .map(|err| err.to_string());
        }
        let parsed = parse_token_request(&request);
        if !parsed.is_clean() {
            let items: Vec<&str> = parsed.invalid.iter().map(|err| err.item.as_str()).collect();
            ui.label(
                RichText::new(format!("Not token ids: {}", items.join(", ")))
                    .small()
                    .color(style::palette().warning),
            );
        }

        self.refresh_views();
        let mut delete = None;
        ui.horizontal_wrapped(|ui| {
            for chip in self.views.chips() {
                ui.push_id(chip.key, |ui| {
                    if widgets::chip(ui, &chip.label) {
                        delete = Some(chip.key);
                    }
                });
            }
        });
        if let Some(key) = delete {
            self.chip_error = chips::delete_chip(&mut self.store, key)
                .err()
                .map(|err| err.to_string());
        }
        if let Some(error) = &self.chip_error {
            ui.label(
                RichText::new(error)
                    .small()
                    .color(style::palette().warning),
            );
        }
    }
}
