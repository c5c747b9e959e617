mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::GeneExplorerApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(out) = &cli.export {
        return export_ranked(&cli, out);
    }

    let mut state = AppState::new(cli.thresholds());
    // Missing startup files are not fatal; File → Open… can load them.
    if cli.measurements.exists() {
        state.load_measurements(&cli.measurements);
    } else {
        log::warn!("{} not found", cli.measurements.display());
    }
    if cli.stats.exists() {
        state.load_stats(&cli.stats);
    } else {
        log::warn!("{} not found", cli.stats.display());
    }
    let missing_input = state.stats_source.is_none() || state.measurements_source.is_none();
    if state.status_lines().next().is_none() && missing_input {
        state.status_message =
            Some("Open the measurement and statistics tables (File → Open…)".into());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gene Biomarker Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(GeneExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Headless mode: rank the statistics table and write it out.
fn export_ranked(cli: &Cli, out: &std::path::Path) -> anyhow::Result<()> {
    let stats = data::loader::load_stats(&cli.stats)?;
    let ranked = data::filter::filter_and_rank(&stats, &cli.thresholds());
    data::export::write_ranked(out, &ranked, &stats)
        .with_context(|| format!("exporting to {}", out.display()))
}
