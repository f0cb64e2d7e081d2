mod app;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::TempTraceApp;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        println!("Usage: {} <path to spreadsheet or CSV file>", args[0]);
        std::process::exit(1);
    }
    let path = PathBuf::from(&args[1]);

    // Load and normalize before the event loop starts; header or data-shape
    // problems are fatal here.
    let series = data::loader::load_document(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Temperature Over Time",
        options,
        Box::new(move |_cc| Ok(Box::new(TempTraceApp::new(AppState::new(path, series))))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run window: {e}"))
}
