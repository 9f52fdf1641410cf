//! egui rendering of the configuration panel.
//!
//! [`ConfigPanel`] owns the store for its whole mounted lifetime. Sections
//! read a fresh snapshot before drawing, so an edit made earlier in a frame
//! is already visible to the sections drawn after it.

mod dataset_section;
mod model_section;
pub mod style;
mod token_translation;
mod vectorization_section;
mod widgets;

use eframe::egui;
use tracing::info;

use crate::binder::{BoundField, bind_all};
use crate::error::MissingKeyError;
use crate::store::{ConfigStore, Snapshot, UpdateSender};
use crate::views::DerivedViews;

pub use dataset_section::DATASET_FIELDS;
pub use model_section::{MODEL_FIELDS, ModelTab};
pub use token_translation::TRANSLATION_PROMPT;
pub use vectorization_section::VECTORIZATION_FIELDS;

/// Root composition: the store, the bound inputs of every section and the
/// derived views they display.
pub struct ConfigPanel {
    store: ConfigStore,
    views: DerivedViews,
    dataset_fields: Vec<BoundField>,
    vectorization_fields: Vec<BoundField>,
    model_fields: Vec<BoundField>,
    model_tab: ModelTab,
    chip_error: Option<String>,
    output_mode_error: Option<String>,
    visuals_set: bool,
}

impl ConfigPanel {
    /// Bind every section's inputs. An unknown field path fails here.
    pub fn new(store: ConfigStore) -> Result<Self, MissingKeyError> {
        let panel = Self {
            dataset_fields: bind_all(&DATASET_FIELDS)?,
            vectorization_fields: bind_all(&VECTORIZATION_FIELDS)?,
            model_fields: bind_all(&MODEL_FIELDS)?,
            store,
            views: DerivedViews::default(),
            model_tab: ModelTab::default(),
            chip_error: None,
            output_mode_error: None,
            visuals_set: false,
        };
        info!(revision = panel.store.revision(), "Configuration panel ready");
        Ok(panel)
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// Queue for results published off the UI thread; drained every frame.
    pub fn update_sender(&self) -> UpdateSender {
        self.store.update_sender()
    }

    pub fn views(&self) -> &DerivedViews {
        &self.views
    }

    pub fn model_tab(&self) -> ModelTab {
        self.model_tab
    }

    pub fn set_model_tab(&mut self, tab: ModelTab) {
        self.model_tab = tab;
    }

    /// Apply queued updates and draw the whole panel.
    pub fn show(&mut self, ctx: &egui::Context) {
        if self.store.drain_pending() > 0 {
            ctx.request_repaint();
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("config_panel_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_dataset_section(ui);
                    ui.add_space(8.0);
                    self.render_vectorization_section(ui);
                    ui.add_space(8.0);
                    self.render_model_section(ui);
                });
        });
    }

    /// Current snapshot with the derived views brought up to date.
    fn snapshot(&mut self) -> Snapshot {
        let snapshot = self.store.read();
        self.views.refresh(&snapshot);
        snapshot
    }

    fn refresh_views(&mut self) {
        self.snapshot();
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }
}

impl eframe::App for ConfigPanel {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.show(ctx);
    }
}

impl Drop for ConfigPanel {
    fn drop(&mut self) {
        info!(revision = self.store.revision(), "Configuration panel unmounted");
    }
}
