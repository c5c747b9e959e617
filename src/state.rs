use std::path::{Path, PathBuf};

use crate::color::CategoryColors;
use crate::data::filter::{RankedGene, Thresholds, filter_and_rank};
use crate::data::loader;
use crate::data::lookup::{GeneView, resolve};
use crate::data::model::{MeasurementTable, StatsTable};

// ---------------------------------------------------------------------------
// View mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    SingleGene,
    CompareTwoGenes,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::SingleGene => "Single Gene",
            ViewMode::CompareTwoGenes => "Compare Two Genes",
        }
    }
}

/// Which gene selector an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneSlot {
    A,
    B,
}

/// Where the gene selectors draw their choices from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneSource {
    /// Genes passing the significance filters, most significant first.
    #[default]
    Filtered,
    /// Every gene in the measurement table, unfiltered, in file order.
    AllMeasured,
}

impl GeneSource {
    pub fn label(self) -> &'static str {
        match self {
            GeneSource::Filtered => "Passing filters",
            GeneSource::AllMeasured => "All measured genes",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Long-format CNA / protein rows (empty until loaded).
    pub measurements: MeasurementTable,
    pub measurements_source: Option<PathBuf>,
    /// Last failure loading the measurement table.
    pub measurements_error: Option<String>,

    /// Per-gene statistics (empty until loaded).
    pub stats: StatsTable,
    pub stats_source: Option<PathBuf>,
    /// Last failure loading the statistics table.
    pub stats_error: Option<String>,

    /// Current slider values.
    pub thresholds: Thresholds,

    pub mode: ViewMode,

    pub gene_source: GeneSource,

    /// Genes passing `thresholds`, most significant first (cached).
    pub ranked: Vec<RankedGene>,

    /// Gene A / Gene B selections; always members of `gene_options()` or `None`.
    pub selection: [Option<String>; 2],

    /// Colour per CNA category across all plots.
    pub colors: CategoryColors,

    /// Prompts and export failures, separate from the load errors.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds: clamp_thresholds(thresholds),
            ..Default::default()
        }
    }

    /// Ingest a newly loaded measurement table.
    pub fn set_measurements(&mut self, table: MeasurementTable, source: Option<PathBuf>) {
        self.colors = CategoryColors::new(&table.categories);
        self.measurements = table;
        self.measurements_source = source;
        self.reconcile_selection();
    }

    /// Ingest a newly loaded statistics table and rerun the filter.
    pub fn set_stats(&mut self, table: StatsTable, source: Option<PathBuf>) {
        self.stats = table;
        self.stats_source = source;
        self.refilter();
    }

    /// Load the measurement table from disk. Only a measurement failure is
    /// cleared on success.
    pub fn load_measurements(&mut self, path: &Path) {
        match loader::load_measurements(path) {
            Ok(table) => {
                self.set_measurements(table, Some(path.to_path_buf()));
                self.measurements_error = None;
            }
            Err(e) => {
                log::error!("Failed to load measurements: {e:#}");
                self.measurements_error = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Load the statistics table from disk. Only a statistics failure is
    /// cleared on success.
    pub fn load_stats(&mut self, path: &Path) {
        match loader::load_stats(path) {
            Ok(table) => {
                self.set_stats(table, Some(path.to_path_buf()));
                self.stats_error = None;
            }
            Err(e) => {
                log::error!("Failed to load statistics: {e:#}");
                self.stats_error = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Every message for the status line: load errors first.
    pub fn status_lines(&self) -> impl Iterator<Item = &str> {
        [&self.measurements_error, &self.stats_error, &self.status_message]
            .into_iter()
            .filter_map(|m| m.as_deref())
    }

    pub fn set_p_threshold(&mut self, p: f64) {
        self.set_thresholds(Thresholds {
            p_value: p,
            ..self.thresholds
        });
    }

    pub fn set_effect_threshold(&mut self, d: f64) {
        self.set_thresholds(Thresholds {
            effect_size: d,
            ..self.thresholds
        });
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        let thresholds = clamp_thresholds(thresholds);
        if thresholds != self.thresholds {
            self.thresholds = thresholds;
            self.refilter();
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn set_gene_source(&mut self, source: GeneSource) {
        if source != self.gene_source {
            self.gene_source = source;
            self.reconcile_selection();
        }
    }

    /// Genes the selectors currently offer, in display order.
    pub fn gene_options(&self) -> Vec<&str> {
        match self.gene_source {
            GeneSource::Filtered => self.ranked.iter().map(|r| r.gene.as_str()).collect(),
            GeneSource::AllMeasured => self.measurements.genes(),
        }
    }

    /// Select `gene` into `slot`. Genes outside `gene_options()` are ignored.
    pub fn select_gene(&mut self, slot: GeneSlot, gene: &str) {
        if self.gene_options().contains(&gene) {
            self.selection[slot as usize] = Some(gene.to_string());
        }
    }

    pub fn selected(&self, slot: GeneSlot) -> Option<&str> {
        self.selection[slot as usize].as_deref()
    }

    /// Recompute `ranked`, then reconcile the selections.
    pub fn refilter(&mut self) {
        self.ranked = filter_and_rank(&self.stats, &self.thresholds);
        log::debug!(
            "p < {}, |d| >= {}: {} of {} genes pass",
            self.thresholds.p_value,
            self.thresholds.effect_size,
            self.ranked.len(),
            self.stats.len()
        );
        self.reconcile_selection();
    }

    /// Keep each selection still on offer, otherwise fall back to
    /// Gene A = first option, Gene B = second (or first).
    fn reconcile_selection(&mut self) {
        let options = self.gene_options();
        let defaults = [options.first().copied(), options.get(1).or(options.first()).copied()];
        let next: Vec<Option<String>> = self
            .selection
            .iter()
            .zip(defaults)
            .map(|(current, fallback)| match current {
                Some(g) if options.contains(&g.as_str()) => Some(g.clone()),
                _ => fallback.map(str::to_string),
            })
            .collect();
        for (slot, gene) in self.selection.iter_mut().zip(next) {
            *slot = gene;
        }
    }

    /// Resolved views for the genes on screen in the current mode.
    pub fn visible_genes(&self) -> Vec<GeneView<'_>> {
        let slots: &[GeneSlot] = match self.mode {
            ViewMode::SingleGene => &[GeneSlot::A],
            ViewMode::CompareTwoGenes => &[GeneSlot::A, GeneSlot::B],
        };
        slots
            .iter()
            .filter_map(|&slot| self.selected(slot))
            .map(|gene| resolve(gene, &self.measurements, &self.stats))
            .collect()
    }
}

fn clamp_thresholds(t: Thresholds) -> Thresholds {
    Thresholds {
        p_value: t.p_value.max(0.0),
        effect_size: t.effect_size.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CnaCategory, Comparison, GeneStatRecord, MeasurementRecord};

    fn rec(gene: &str, amp_p: f64, amp_d: f64) -> GeneStatRecord {
        GeneStatRecord {
            gene: gene.into(),
            amplification: Comparison {
                t_statistic: Some(2.0),
                p_value: Some(amp_p),
                cohens_d: Some(amp_d),
            },
            deletion: Comparison {
                t_statistic: Some(0.0),
                p_value: Some(0.9),
                cohens_d: Some(0.0),
            },
        }
    }

    fn state() -> AppState {
        let mut state = AppState::new(Thresholds::default());
        state.set_measurements(
            MeasurementTable::from_rows(vec![MeasurementRecord {
                gene: "EGFR".into(),
                cna_category: CnaCategory::Score(2),
                protein_expression: 1.0,
            }]),
            None,
        );
        state.set_stats(
            StatsTable::from_records(vec![
                rec("MYC", 0.04, 0.5),
                rec("EGFR", 0.001, 1.0),
                rec("ERBB2", 0.01, 0.4),
            ])
            .unwrap(),
            None,
        );
        state
    }

    #[test]
    fn defaults_pick_first_and_second_ranked() {
        let s = state();
        assert_eq!(s.ranked.len(), 3);
        assert_eq!(s.selected(GeneSlot::A), Some("EGFR"));
        assert_eq!(s.selected(GeneSlot::B), Some("ERBB2"));
    }

    #[test]
    fn selection_survives_when_still_ranked() {
        let mut s = state();
        s.select_gene(GeneSlot::A, "ERBB2");
        s.set_p_threshold(0.02);
        assert_eq!(s.ranked.len(), 2);
        assert_eq!(s.selected(GeneSlot::A), Some("ERBB2"));
    }

    #[test]
    fn selection_falls_back_when_filtered_out() {
        let mut s = state();
        s.select_gene(GeneSlot::A, "MYC");
        s.set_effect_threshold(0.9);
        assert_eq!(s.selected(GeneSlot::A), Some("EGFR"));
        // only one gene left: B falls back to the first
        assert_eq!(s.selected(GeneSlot::B), Some("EGFR"));
    }

    #[test]
    fn empty_ranking_clears_selection() {
        let mut s = state();
        s.set_p_threshold(0.0);
        assert!(s.ranked.is_empty());
        assert_eq!(s.selection, [None, None]);
        assert!(s.visible_genes().is_empty());
    }

    #[test]
    fn unknown_gene_is_not_selected() {
        let mut s = state();
        s.select_gene(GeneSlot::B, "BRCA1");
        assert_eq!(s.selected(GeneSlot::B), Some("ERBB2"));
    }

    #[test]
    fn negative_thresholds_are_clamped() {
        let mut s = state();
        s.set_effect_threshold(-1.0);
        assert_eq!(s.thresholds.effect_size, 0.0);
    }

    #[test]
    fn compare_mode_resolves_two_genes() {
        let mut s = state();
        assert_eq!(s.visible_genes().len(), 1);
        s.set_mode(ViewMode::CompareTwoGenes);
        let views = s.visible_genes();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].gene, "EGFR");
        assert!(views[0].has_measurements());
        assert_eq!(views[1].gene, "ERBB2");
        assert!(!views[1].has_measurements());
        assert!(views[1].stats.is_some());
    }

    #[test]
    fn measurement_error_survives_a_good_stats_load() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("cnv.csv");
        std::fs::write(&bad, "Gene,Protein\nEGFR,1.0\n").unwrap();
        let good = dir.path().join("stats.csv");
        std::fs::write(
            &good,
            "Gene,T-statistic (Amplification vs Neutral),P-value (Amplification vs Neutral),\
             Cohen's d (Amplification vs Neutral),T-statistic (Deletion vs Neutral),\
             P-value (Deletion vs Neutral),Cohen's d (Deletion vs Neutral)\n\
             EGFR,3.1,0.001,0.9,0.2,0.8,0.05\n",
        )
        .unwrap();

        let mut s = AppState::new(Thresholds::default());
        s.load_measurements(&bad);
        s.load_stats(&good);

        assert_eq!(s.stats.len(), 1);
        assert!(s.stats_error.is_none());
        let lines: Vec<&str> = s.status_lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("CNA"), "{}", lines[0]);

        // a later good measurements load clears only its own error
        let fixed = dir.path().join("cnv_fixed.csv");
        std::fs::write(&fixed, "Gene,CNA,Protein\nEGFR,1,1.0\n").unwrap();
        s.load_measurements(&fixed);
        assert_eq!(s.status_lines().count(), 0);
    }

    #[test]
    fn all_measured_genes_include_genes_without_stats() {
        let mut s = state();
        s.set_measurements(
            MeasurementTable::from_rows(vec![
                MeasurementRecord {
                    gene: "ORPHAN".into(),
                    cna_category: CnaCategory::Score(-1),
                    protein_expression: 0.3,
                },
                MeasurementRecord {
                    gene: "EGFR".into(),
                    cna_category: CnaCategory::Score(2),
                    protein_expression: 1.0,
                },
            ]),
            None,
        );
        assert_eq!(s.gene_options(), vec!["EGFR", "ERBB2", "MYC"]);

        s.set_gene_source(GeneSource::AllMeasured);
        assert_eq!(s.gene_options(), vec!["ORPHAN", "EGFR"]);
        // EGFR is still on offer; ERBB2 falls back to the second gene
        assert_eq!(s.selected(GeneSlot::A), Some("EGFR"));
        assert_eq!(s.selected(GeneSlot::B), Some("EGFR"));

        s.select_gene(GeneSlot::A, "ORPHAN");
        let view = &s.visible_genes()[0];
        assert_eq!(view.gene, "ORPHAN");
        assert!(view.has_measurements());
        assert!(view.stats.is_none());

        // the measured list ignores the significance cut-offs
        s.set_p_threshold(0.0);
        assert!(s.ranked.is_empty());
        assert_eq!(s.selected(GeneSlot::A), Some("ORPHAN"));

        s.set_gene_source(GeneSource::Filtered);
        assert_eq!(s.selection, [None, None]);
    }
}
