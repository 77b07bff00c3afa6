mod app;
mod charts;
mod color;
mod config;
mod data;
mod page;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::QuakeDashApp;
use config::DashboardConfig;
use data::filter::FilterControls;
use data::loader::DatasetCache;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let config = DashboardConfig::parse();

    // Owns the dataset for the rest of the process.
    let cache = DatasetCache::new(&config.data);
    let dataset = cache.get_or_load().map_err(|e| {
        log::error!("Failed to load dataset: {e}");
        e
    })?;

    if config.dump_json {
        let criteria = FilterControls::from_dataset(&dataset).initial_criteria(config.min_magnitude);
        let page = page::render(&dataset, &criteria);
        let stdout = std::io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &page).context("writing page JSON")?;
        println!();
        return Ok(());
    }

    let state = AppState::new(dataset, cache.path().to_path_buf(), config.min_magnitude);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Earthquake & Tsunami Risk Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(QuakeDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
