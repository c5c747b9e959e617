use super::model::StatsTable;

// ---------------------------------------------------------------------------
// Filter thresholds
// ---------------------------------------------------------------------------

/// User-chosen significance cut-offs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// A side passes only when its p-value is strictly below this.
    pub p_value: f64,
    /// A side passes when |Cohen's d| is at least this.
    pub effect_size: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            p_value: 0.05,
            effect_size: 0.3,
        }
    }
}

// ---------------------------------------------------------------------------
// Ranked output
// ---------------------------------------------------------------------------

/// A gene that passed the filter, with its ranking key.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGene {
    pub gene: String,
    /// min(amplification p-value, deletion p-value).
    pub min_p_value: f64,
    /// Position of the record in [`StatsTable::records`].
    pub record_index: usize,
}

/// Return the genes passing `thresholds`, most significant first.
///
/// A record is eligible only when both p-values and both effect sizes are
/// present. It passes when either the amplification or the deletion side
/// clears both cut-offs. Ties on the minimum p-value keep table order.
pub fn filter_and_rank(stats: &StatsTable, thresholds: &Thresholds) -> Vec<RankedGene> {
    let mut ranked: Vec<RankedGene> = stats
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.is_complete())
        .filter(|(_, rec)| {
            let amp = rec
                .amplification
                .passes(thresholds.p_value, thresholds.effect_size);
            let del = rec
                .deletion
                .passes(thresholds.p_value, thresholds.effect_size);
            amp == Some(true) || del == Some(true)
        })
        .filter_map(|(i, rec)| {
            Some(RankedGene {
                gene: rec.gene.clone(),
                min_p_value: rec.min_p_value()?,
                record_index: i,
            })
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.min_p_value.total_cmp(&b.min_p_value));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Comparison, GeneStatRecord};

    fn side(p: f64, d: f64) -> Comparison {
        Comparison {
            t_statistic: Some(1.0),
            p_value: Some(p),
            cohens_d: Some(d),
        }
    }

    fn rec(gene: &str, amp_p: f64, amp_d: f64, del_p: f64, del_d: f64) -> GeneStatRecord {
        GeneStatRecord {
            gene: gene.to_string(),
            amplification: side(amp_p, amp_d),
            deletion: side(del_p, del_d),
        }
    }

    fn table(records: Vec<GeneStatRecord>) -> StatsTable {
        StatsTable::from_records(records).unwrap()
    }

    fn genes(ranked: &[RankedGene]) -> Vec<&str> {
        ranked.iter().map(|r| r.gene.as_str()).collect()
    }

    fn th(p: f64, d: f64) -> Thresholds {
        Thresholds {
            p_value: p,
            effect_size: d,
        }
    }

    fn mixed_table() -> StatsTable {
        table(vec![
            rec("EGFR", 0.001, 0.9, 0.5, 0.1),
            rec("MYC", 0.03, 0.35, 0.04, -0.8),
            rec("PTEN", 0.6, 0.1, 0.0005, -1.4),
            rec("KRAS", 0.049, 0.3, 0.2, 0.2),
            rec("CDKN2A", 0.08, 1.2, 0.09, 1.1),
            rec("ERBB2", 0.01, 0.2, 0.02, 0.25),
        ])
    }

    #[test]
    fn scenario_ties_keep_input_order() {
        let stats = table(vec![
            rec("A", 0.001, 0.5, 0.2, 0.1),
            rec("B", 0.2, 0.1, 0.001, 0.6),
        ]);
        let ranked = filter_and_rank(&stats, &th(0.05, 0.3));
        assert_eq!(genes(&ranked), vec!["A", "B"]);
        assert_eq!(ranked[0].min_p_value, 0.001);
        assert_eq!(ranked[1].min_p_value, 0.001);
        assert_eq!(ranked[1].record_index, 1);
    }

    #[test]
    fn empty_table_gives_empty_output() {
        let ranked = filter_and_rank(&StatsTable::default(), &Thresholds::default());
        assert!(ranked.is_empty());
    }

    #[test]
    fn either_side_is_enough() {
        let stats = table(vec![rec("AMP_ONLY", 0.01, 0.5, 0.9, 0.0)]);
        let ranked = filter_and_rank(&stats, &th(0.05, 0.3));
        assert_eq!(genes(&ranked), vec!["AMP_ONLY"]);
    }

    #[test]
    fn both_criteria_must_hold_on_the_same_side() {
        // amp has the p-value, del has the effect: neither side passes alone
        let stats = table(vec![rec("SPLIT", 0.01, 0.1, 0.9, 0.9)]);
        assert!(filter_and_rank(&stats, &th(0.05, 0.3)).is_empty());
    }

    #[test]
    fn p_value_boundary_is_strict() {
        let stats = table(vec![rec("EDGE", 0.05, 1.0, 0.05, 1.0)]);
        assert!(filter_and_rank(&stats, &th(0.05, 0.3)).is_empty());
    }

    #[test]
    fn effect_boundary_is_inclusive() {
        let stats = table(vec![
            rec("POS", 0.01, 0.3, 0.9, 0.0),
            rec("NEG", 0.9, 0.0, 0.02, -0.3),
        ]);
        let ranked = filter_and_rank(&stats, &th(0.05, 0.3));
        assert_eq!(genes(&ranked), vec!["POS", "NEG"]);
    }

    #[test]
    fn incomplete_records_never_pass() {
        let mut missing_del_d = rec("NO_DEL_D", 0.0001, 2.0, 0.5, 0.1);
        missing_del_d.deletion.cohens_d = None;
        let mut missing_amp_p = rec("NO_AMP_P", 0.0001, 2.0, 0.0001, 2.0);
        missing_amp_p.amplification.p_value = None;
        let stats = table(vec![missing_del_d, missing_amp_p, rec("OK", 0.01, 1.0, 0.5, 0.0)]);

        for (p, d) in [(1.0, 0.0), (0.05, 0.3), (f64::INFINITY, 0.0)] {
            assert_eq!(genes(&filter_and_rank(&stats, &th(p, d))), vec!["OK"]);
        }
    }

    #[test]
    fn missing_t_statistic_does_not_exclude() {
        let mut r = rec("NO_T", 0.01, 1.0, 0.5, 0.0);
        r.amplification.t_statistic = None;
        let stats = table(vec![r]);
        assert_eq!(filter_and_rank(&stats, &th(0.05, 0.3)).len(), 1);
    }

    #[test]
    fn output_is_sorted_by_min_p_value() {
        let ranked = filter_and_rank(&mixed_table(), &th(0.1, 0.2));
        assert_eq!(genes(&ranked), vec!["PTEN", "EGFR", "ERBB2", "MYC", "KRAS", "CDKN2A"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].min_p_value <= pair[1].min_p_value);
        }
    }

    #[test]
    fn lowering_p_threshold_never_grows_the_result() {
        let stats = mixed_table();
        let mut previous = usize::MAX;
        for step in (0..=20).rev() {
            let p = step as f64 * 0.005;
            let n = filter_and_rank(&stats, &th(p, 0.3)).len();
            assert!(n <= previous, "p={p}: {n} > {previous}");
            previous = n;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn raising_effect_threshold_never_grows_the_result() {
        let stats = mixed_table();
        let mut previous = usize::MAX;
        for step in 0..=20 {
            let d = step as f64 * 0.1;
            let n = filter_and_rank(&stats, &th(0.05, d)).len();
            assert!(n <= previous, "d={d}: {n} > {previous}");
            previous = n;
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let stats = mixed_table();
        let first = filter_and_rank(&stats, &th(0.05, 0.3));
        for _ in 0..5 {
            assert_eq!(filter_and_rank(&stats, &th(0.05, 0.3)), first);
        }
    }

    #[test]
    fn source_table_is_untouched() {
        let stats = mixed_table();
        let before = stats.records.clone();
        let _ = filter_and_rank(&stats, &th(0.05, 0.3));
        assert_eq!(stats.records, before);
    }
}
