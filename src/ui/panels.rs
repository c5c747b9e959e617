use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, GeneSlot, GeneSource, ViewMode};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let mut p = state.thresholds.p_value;
    if ui
        .add(
            egui::Slider::new(&mut p, 0.0..=0.1)
                .step_by(0.005)
                .text("P-value cutoff"),
        )
        .changed()
    {
        state.set_p_threshold(p);
    }

    let mut d = state.thresholds.effect_size;
    if ui
        .add(
            egui::Slider::new(&mut d, 0.0..=2.0)
                .step_by(0.1)
                .text("Effect size (Cohen's d)"),
        )
        .changed()
    {
        state.set_effect_threshold(d);
    }

    ui.label(format!(
        "{} of {} genes pass",
        state.ranked.len(),
        state.stats.len()
    ));
    ui.separator();

    ui.strong("Mode:");
    let mut mode = state.mode;
    for m in [ViewMode::SingleGene, ViewMode::CompareTwoGenes] {
        ui.radio_value(&mut mode, m, m.label());
    }
    if mode != state.mode {
        state.set_mode(mode);
    }
    ui.separator();

    ui.strong("Genes:");
    let mut source = state.gene_source;
    for src in [GeneSource::Filtered, GeneSource::AllMeasured] {
        ui.radio_value(&mut source, src, src.label());
    }
    if source != state.gene_source {
        state.set_gene_source(source);
    }
    ui.add_space(4.0);

    match state.mode {
        ViewMode::SingleGene => gene_selector(ui, state, GeneSlot::A, "Choose a gene:"),
        ViewMode::CompareTwoGenes => {
            gene_selector(ui, state, GeneSlot::A, "Gene A");
            gene_selector(ui, state, GeneSlot::B, "Gene B");
        }
    }

    let empty_notice = match state.gene_source {
        GeneSource::Filtered if state.ranked.is_empty() => {
            Some("No genes pass the current filters.")
        }
        GeneSource::AllMeasured if state.measurements.is_empty() => {
            Some("No measurement table loaded.")
        }
        _ => None,
    };
    if let Some(notice) = empty_notice {
        ui.add_space(4.0);
        ui.label(RichText::new(notice).italics());
    }
}

/// Combo box listing the current gene options; disabled when there are none.
fn gene_selector(ui: &mut Ui, state: &mut AppState, slot: GeneSlot, label: &str) {
    ui.label(label);
    let current = state.selected(slot).unwrap_or("(none)").to_string();
    let mut picked: Option<String> = None;

    let entries: Vec<(String, String)> = match state.gene_source {
        GeneSource::Filtered => state
            .ranked
            .iter()
            .map(|r| (r.gene.clone(), format!("{}   p={:.1e}", r.gene, r.min_p_value)))
            .collect(),
        GeneSource::AllMeasured => state
            .gene_options()
            .into_iter()
            .map(|g| (g.to_string(), g.to_string()))
            .collect(),
    };

    ui.add_enabled_ui(!entries.is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt(("gene_selector", slot as usize))
            .selected_text(&current)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for (gene, text) in &entries {
                    if ui.selectable_label(*gene == current, text).clicked() {
                        picked = Some(gene.clone());
                    }
                }
            });
    });

    if let Some(gene) = picked {
        state.select_gene(slot, &gene);
    }
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open measurements…").clicked() {
                open_measurements_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open statistics…").clicked() {
                open_stats_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(!state.ranked.is_empty(), egui::Button::new("Export ranked genes…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} genes in statistics, {} pass filters",
            state.stats.len(),
            state.ranked.len()
        ));
        if !state.measurements.is_empty() {
            ui.separator();
            ui.label(format!(
                "{} measurement rows across {} genes",
                state.measurements.len(),
                state.measurements.genes().len()
            ));
        }

        for msg in state.status_lines() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Credit line at the bottom of the window.
pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("Built for BioSLATE, in collaboration with Breakthrough Cancer Research")
                .small(),
        );
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn table_dialog(title: &str) -> rfd::FileDialog {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
}

pub fn open_measurements_dialog(state: &mut AppState) {
    if let Some(path) = table_dialog("Open CNA / protein table").pick_file() {
        state.load_measurements(&path);
    }
}

pub fn open_stats_dialog(state: &mut AppState) {
    if let Some(path) = table_dialog("Open per-gene statistics").pick_file() {
        state.load_stats(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export ranked genes")
        .set_file_name("ranked_genes.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::write_ranked(&path, &state.ranked, &state.stats) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
