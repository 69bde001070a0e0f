//! Mood Flow - particle flow-field sketch
//! Energy, tension and warmth sliders steer a noise flow field; the pointer
//! leaves ripples and line marks.

mod app;
mod bounded;
mod config;
mod easing;
mod export;
mod flow;
mod input;
mod mapping;
mod noise_source;
mod palette;
mod particle;
mod presets;
mod raster;
mod ripple;
mod simulation;
mod surface;

use app::MoodFlowApp;
use config::{AppConfig, DEFAULT_CONFIG_FILE};
use eframe::egui;
use std::path::Path;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE));
    log::info!("Starting Mood Flow");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.canvas.width as f32 + 300.0,
                config.canvas.height as f32 + 40.0,
            ])
            .with_title("Mood Flow")
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mood Flow",
        options,
        Box::new(|cc| Box::new(MoodFlowApp::new(cc, config))),
    )
}
