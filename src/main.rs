mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::TokoDashApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));
    let mut state = AppState::new(&config);

    match data::loader::load(&config.data_path) {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("Failed to load {}: {e}", config.data_path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Tokopedia Men's Clothing Analysis")
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tokopedia Men's Clothing Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(TokoDashApp::new(state)))),
    )
}
