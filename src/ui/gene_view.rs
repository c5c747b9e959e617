use eframe::egui::{ScrollArea, Ui};

use crate::state::{AppState, GeneSource, ViewMode};
use crate::ui::{plot, summary};

// ---------------------------------------------------------------------------
// Central panel – one gene or two genes side by side
// ---------------------------------------------------------------------------

/// Render the selected gene(s) in the central panel.
pub fn central_view(ui: &mut Ui, state: &AppState) {
    let views = state.visible_genes();
    if views.is_empty() {
        let message = match state.gene_source {
            GeneSource::Filtered if state.stats.is_empty() => {
                "Open a statistics table to browse genes  (File → Open statistics…)"
            }
            GeneSource::Filtered => {
                "No genes pass the current filters. Relax the cutoffs to see more."
            }
            GeneSource::AllMeasured => {
                "Open a measurement table to browse genes  (File → Open measurements…)"
            }
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.mode {
            ViewMode::SingleGene => {
                let view = &views[0];
                ui.heading(format!("Gene: {}", view.gene));
                ui.add_space(6.0);
                ui.strong("Statistical Summary");
                summary::stats_two_columns(ui, view);
                ui.separator();
                ui.strong("Protein Expression by CNA GISTIC Score");
                plot::cna_boxplot(
                    ui,
                    "single_boxplot",
                    view,
                    &state.colors,
                    &format!("Protein Expression vs CNA for {}", view.gene),
                    360.0,
                );
            }
            ViewMode::CompareTwoGenes => {
                ui.columns(views.len(), |cols: &mut [Ui]| {
                    for (col, view) in cols.iter_mut().zip(&views) {
                        col.heading(view.gene);
                        summary::stats_stacked(col, view);
                    }
                });
                ui.separator();
                ui.heading("Side-by-side Boxplots");
                ui.columns(views.len(), |cols: &mut [Ui]| {
                    for (i, (col, view)) in cols.iter_mut().zip(&views).enumerate() {
                        plot::cna_boxplot(
                            col,
                            ("compare_boxplot", i),
                            view,
                            &state.colors,
                            view.gene,
                            300.0,
                        );
                    }
                });
            }
        });
}
