use eframe::egui::{self, CornerRadius, Margin, RichText};

use super::style;
use crate::binder::{BoundField, FieldBinder, NumberBinder, NumericLeaf};
use crate::error::FieldError;
use crate::store::{ConfigStore, Snapshot};

const FIELD_WIDTH: f32 = 260.0;
const NUMBER_WIDTH: f32 = 96.0;

pub(super) fn section_label(ui: &mut egui::Ui, label: &str) {
    ui.label(
        RichText::new(label)
            .strong()
            .color(style::palette().text_primary),
    );
}

pub(super) fn muted(ui: &mut egui::Ui, text: impl Into<String>) {
    ui.label(RichText::new(text).color(style::palette().text_muted));
}

fn field_error(ui: &mut egui::Ui, error: Option<&FieldError>) {
    if let Some(error) = error {
        ui.label(
            RichText::new(error.to_string())
                .small()
                .color(style::palette().warning),
        );
    }
}

/// Label/widget grid for a list of bound fields. Each edit proposes at once.
pub(super) fn field_grid(
    ui: &mut egui::Ui,
    grid_id: &str,
    fields: &mut [BoundField],
    store: &mut ConfigStore,
    snapshot: &Snapshot,
) {
    egui::Grid::new(grid_id)
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for field in fields.iter_mut() {
                muted(ui, field.spec.label);
                ui.vertical(|ui| {
                    field_widget(ui, field, store, snapshot);
                    field_error(ui, field.binder.error());
                });
                ui.end_row();
            }
        });
}

fn field_widget(
    ui: &mut egui::Ui,
    field: &mut BoundField,
    store: &mut ConfigStore,
    snapshot: &Snapshot,
) {
    let id = egui::Id::new(("config_field", field.spec.id));
    match &mut field.binder {
        FieldBinder::Text(binder) => {
            let mut text = binder.current(snapshot).to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut text)
                    .id(id)
                    .desired_width(FIELD_WIDTH),
            );
            if response.changed() {
                binder.commit(store, text);
            }
        }
        FieldBinder::Count(binder) => number_widget(ui, id, binder, store, snapshot),
        FieldBinder::Seed(binder) => number_widget(ui, id, binder, store, snapshot),
        FieldBinder::Toggle(binder) => {
            let mut value = binder.value(snapshot);
            if ui.checkbox(&mut value, "").changed() {
                binder.commit(store, value);
            }
        }
    }
}

fn number_widget<N: NumericLeaf>(
    ui: &mut egui::Ui,
    id: egui::Id,
    binder: &mut NumberBinder<N>,
    store: &mut ConfigStore,
    snapshot: &Snapshot,
) {
    let mut text = binder.display_text(snapshot);
    let (response, step) = NumericInput::new(&mut text, id)
        .width(NUMBER_WIDTH)
        .show(ui);
    if let Some(up) = step {
        binder.step(store, up);
    } else if response.changed() {
        binder.commit(store, &text);
    }
}

/// Single-line text input for numbers; ArrowUp/ArrowDown step the value.
pub(super) struct NumericInput<'a> {
    value: &'a mut String,
    id: egui::Id,
    width: f32,
}

impl<'a> NumericInput<'a> {
    pub(super) fn new(value: &'a mut String, id: egui::Id) -> Self {
        Self {
            value,
            id,
            width: 64.0,
        }
    }

    pub(super) fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Returns the response and `Some(up)` when an arrow key asked for a step.
    pub(super) fn show(self, ui: &mut egui::Ui) -> (egui::Response, Option<bool>) {
        let mut step = None;
        if ui.memory(|m| m.has_focus(self.id)) {
            ui.input_mut(|i| {
                if i.key_pressed(egui::Key::ArrowUp) {
                    step = Some(true);
                } else if i.key_pressed(egui::Key::ArrowDown) {
                    step = Some(false);
                }
                if step.is_some() {
                    // TextEdit would otherwise move the cursor to the start or end.
                    i.events.retain(|e| {
                        !matches!(
                            e,
                            egui::Event::Key {
                                key: egui::Key::ArrowUp | egui::Key::ArrowDown,
                                ..
                            }
                        )
                    });
                }
            });
        }

        let output = egui::TextEdit::singleline(self.value)
            .id(self.id)
            .desired_width(self.width)
            .show(ui);
        let response = output.response;

        if (step.is_some() || response.gained_focus()) && response.has_focus() {
            let mut state = output.state;
            state
                .cursor
                .set_char_range(Some(egui::text::CCursorRange::select_all(&output.galley)));
            state.store(ui.ctx(), response.id);
        }
        (response, step)
    }
}

/// Removable tag. Returns true when its delete button was clicked.
pub(super) fn chip(ui: &mut egui::Ui, label: &str) -> bool {
    let mut delete = false;
    egui::Frame::new()
        .stroke(style::chip_stroke())
        .corner_radius(CornerRadius::same(10))
        .inner_margin(Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(label);
                delete = ui.small_button("x").on_hover_text("Remove").clicked();
            });
        });
    delete
}

pub(super) fn stat_card(ui: &mut egui::Ui, title: &str, stat: &str) {
    egui::Frame::new()
        .fill(style::card_fill())
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.set_min_width(140.0);
            muted(ui, title);
            ui.label(RichText::new(stat).size(22.0).strong());
        });
}
