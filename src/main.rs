mod app;
mod config;
mod error;
mod gallery;
mod gui;
mod log;
mod pipeline;

use std::path::PathBuf;

use app::TrackerApp;
use config::{AppConfig, DEFAULT_CONFIG_FILE};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    ::log::info!("Starting Particle Tracker v{}", env!("CARGO_PKG_VERSION"));

    // Optional first argument: path to the config file
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = AppConfig::load_or_default(&config_path).unwrap_or_else(|e| {
        ::log::error!("{} — falling back to default settings", e);
        AppConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Particle Tracker")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Particle Tracker",
        options,
        Box::new(move |cc| Ok(Box::new(TrackerApp::new(cc, config, config_path)))),
    )
}
