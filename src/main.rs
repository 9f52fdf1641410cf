#![deny(missing_docs)]

//! Development host: mounts the configuration panel in a native window and
//! keeps its tool config in a JSON file.
use classifier_panel::host::{self, FileHost};
use classifier_panel::logging;
use classifier_panel::panel::ConfigPanel;
use classifier_panel::settings::{self, PanelSettings};
use eframe::egui;

const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(720.0, 560.0);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_or_default().unwrap_or_else(|err| {
        eprintln!("Using default settings: {err}");
        PanelSettings::default()
    });
    let logging = logging::LogConfig::from_settings(&settings)
        .and_then(|config| logging::init(&config));
    if let Err(err) = logging {
        eprintln!("Logging disabled: {err}");
    }

    let launch = settings
        .resolve_tool_config_path()
        .map_err(|err| format!("No tool config location: {err}"))
        .and_then(|path| {
            tracing::info!("Tool config at {}", path.display());
            let store = host::mount(FileHost::new(path), settings.persist_on_update);
            ConfigPanel::new(store).map_err(|err| {
                tracing::error!("Panel wiring is broken: {err}");
                format!("Panel wiring is broken: {err}")
            })
        });

    let viewport = egui::ViewportBuilder::default()
        .with_title("Text Classifier Configuration")
        .with_inner_size([960.0, 820.0])
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Text Classifier Configuration",
        native_options,
        Box::new(move |_cc| match launch {
            Ok(panel) => Ok(Box::new(panel)),
            Err(message) => Ok(Box::new(LaunchError { message })),
        }),
    )?;
    Ok(())
}

struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start panel");
                ui.label(&self.message);
            });
        });
    }
}
