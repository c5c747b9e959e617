use eframe::egui;

use crate::state::AppState;
use crate::ui::{gene_view, panels, summary};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GeneExplorerApp {
    pub state: AppState,
}

impl GeneExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for GeneExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: thresholds, mode, gene selection ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panels: credit line, ranked gene table ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        if !self.state.ranked.is_empty() {
            egui::TopBottomPanel::bottom("ranked_table")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    summary::ranked_table(ui, &mut self.state);
                });
        }

        // ---- Central panel: statistics and boxplots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            gene_view::central_view(ui, &self.state);
        });
    }
}
