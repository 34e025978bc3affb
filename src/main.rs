//! NRAR Viz - Simulation KPI Dashboard
//!
//! Usage: `nrar_viz [CONFIG.json]`. Without a config file the built-in
//! experiment pages are used.

use anyhow::Context;
use eframe::egui;
use nrar_viz::config::DashboardConfig;
use nrar_viz::gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => DashboardConfig::load(&path)
            .with_context(|| format!("loading config {}", path.to_string_lossy()))?,
        None => DashboardConfig::default(),
    };
    let title = config.title.clone();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(&title),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard exited with error: {}", e))
}
