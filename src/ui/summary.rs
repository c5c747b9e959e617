use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::lookup::GeneView;
use crate::data::model::Comparison;
use crate::state::{AppState, GeneSlot, GeneSource};

// ---------------------------------------------------------------------------
// Statistical summary text
// ---------------------------------------------------------------------------

fn fixed(v: Option<f64>) -> String {
    v.map_or_else(|| "NaN".to_string(), |v| format!("{v:.3}"))
}

fn scientific(v: Option<f64>) -> String {
    v.map_or_else(|| "NaN".to_string(), |v| format!("{v:.2e}"))
}

/// The three lines for one comparison, e.g. `short = "Amp"`.
pub fn comparison_lines(ui: &mut Ui, short: &str, c: &Comparison) {
    ui.label(format!("T-stat ({short} vs Neutral): {}", fixed(c.t_statistic)));
    ui.label(format!("P-value ({short} vs Neutral): {}", scientific(c.p_value)));
    ui.label(format!("Cohen's d ({short} vs Neutral): {}", fixed(c.cohens_d)));
}

/// Amplification and deletion summaries in two columns.
pub fn stats_two_columns(ui: &mut Ui, view: &GeneView<'_>) {
    let Some(rec) = view.stats else {
        no_stats(ui, view.gene);
        return;
    };
    ui.columns(2, |cols: &mut [Ui]| {
        comparison_lines(&mut cols[0], "Amp", &rec.amplification);
        comparison_lines(&mut cols[1], "Del", &rec.deletion);
    });
}

/// Amplification then deletion summary, stacked.
pub fn stats_stacked(ui: &mut Ui, view: &GeneView<'_>) {
    let Some(rec) = view.stats else {
        no_stats(ui, view.gene);
        return;
    };
    comparison_lines(ui, "Amp", &rec.amplification);
    comparison_lines(ui, "Del", &rec.deletion);
}

fn no_stats(ui: &mut Ui, gene: &str) {
    ui.label(RichText::new(format!("No statistics available for {gene}")).italics());
}

// ---------------------------------------------------------------------------
// Ranked gene table
// ---------------------------------------------------------------------------

/// Table of every gene passing the filters; clicking a row selects it as Gene A
/// and switches the selectors back to the filtered list.
pub fn ranked_table(ui: &mut Ui, state: &mut AppState) {
    ui.strong(format!("Ranked genes ({})", state.ranked.len()));

    let selected = state.selected(GeneSlot::A).map(str::to_string);
    let mut clicked: Option<String> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(90.0))
        .columns(Column::auto().at_least(80.0), 4)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["#", "Gene", "Min p", "Amp p", "Amp d", "Del p", "Del d"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.ranked.len(), |mut row| {
                let idx = row.index();
                let r = &state.ranked[idx];
                let rec = &state.stats.records[r.record_index];
                row.set_selected(selected.as_deref() == Some(r.gene.as_str()));

                row.col(|ui| {
                    ui.label((idx + 1).to_string());
                });
                row.col(|ui| {
                    ui.label(&r.gene);
                });
                row.col(|ui| {
                    ui.label(format!("{:.2e}", r.min_p_value));
                });
                row.col(|ui| {
                    ui.label(scientific(rec.amplification.p_value));
                });
                row.col(|ui| {
                    ui.label(fixed(rec.amplification.cohens_d));
                });
                row.col(|ui| {
                    ui.label(scientific(rec.deletion.p_value));
                });
                row.col(|ui| {
                    ui.label(fixed(rec.deletion.cohens_d));
                });

                if row.response().clicked() {
                    clicked = Some(r.gene.clone());
                }
            });
        });

    if let Some(gene) = clicked {
        state.set_gene_source(GeneSource::Filtered);
        state.select_gene(GeneSlot::A, &gene);
    }
}
