use std::collections::BTreeMap;

use super::model::{CnaCategory, MeasurementRecord};

// ---------------------------------------------------------------------------
// Box statistics per CNA category
// ---------------------------------------------------------------------------

/// Five-number summary used to draw one box. Outliers are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub category: CnaCategory,
    pub n: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within 1.5 × IQR below Q1.
    pub lower_whisker: f64,
    /// Largest value within 1.5 × IQR above Q3.
    pub upper_whisker: f64,
}

/// Group protein values by CNA category and summarise each group.
///
/// Categories come out in their natural order. NaN values are skipped and a
/// category with no finite values is omitted.
pub fn box_stats(rows: &[&MeasurementRecord]) -> Vec<BoxStats> {
    let mut groups: BTreeMap<&CnaCategory, Vec<f64>> = BTreeMap::new();
    for r in rows {
        if r.protein_expression.is_finite() {
            groups
                .entry(&r.cna_category)
                .or_default()
                .push(r.protein_expression);
        }
    }

    groups
        .into_iter()
        .filter_map(|(cat, mut values)| {
            values.sort_by(f64::total_cmp);
            summarise(cat.clone(), &values)
        })
        .collect()
}

/// `sorted` must be ascending and free of NaN.
fn summarise(category: CnaCategory, sorted: &[f64]) -> Option<BoxStats> {
    let first = *sorted.first()?;
    let last = *sorted.last()?;
    let q1 = percentile(sorted, 0.25);
    let median = percentile(sorted, 0.5);
    let q3 = percentile(sorted, 0.75);
    let reach = 1.5 * (q3 - q1);

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&v| v >= q1 - reach)
        .unwrap_or(first);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= q3 + reach)
        .unwrap_or(last);

    Some(BoxStats {
        category,
        n: sorted.len(),
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
    })
}

/// Linear interpolation between closest ranks (NumPy's default method).
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[(i32, f64)]) -> Vec<MeasurementRecord> {
        values
            .iter()
            .map(|&(c, p)| MeasurementRecord {
                gene: "EGFR".into(),
                cna_category: CnaCategory::Score(c),
                protein_expression: p,
            })
            .collect()
    }

    #[test]
    fn five_values() {
        let data = rows(&[(0, 5.0), (0, 1.0), (0, 3.0), (0, 2.0), (0, 4.0)]);
        let refs: Vec<_> = data.iter().collect();
        let stats = box_stats(&refs);
        assert_eq!(stats.len(), 1);
        let b = &stats[0];
        assert_eq!(b.n, 5);
        assert_eq!((b.q1, b.median, b.q3), (2.0, 3.0, 4.0));
        assert_eq!((b.lower_whisker, b.upper_whisker), (1.0, 5.0));
    }

    #[test]
    fn outlier_is_outside_whiskers() {
        let data = rows(&[(1, 1.0), (1, 2.0), (1, 3.0), (1, 4.0), (1, 100.0)]);
        let refs: Vec<_> = data.iter().collect();
        let b = &box_stats(&refs)[0];
        // IQR = 2, upper fence = 4 + 3 = 7
        assert_eq!(b.upper_whisker, 4.0);
        assert_eq!(b.lower_whisker, 1.0);
    }

    #[test]
    fn interpolates_between_ranks() {
        let data = rows(&[(0, 1.0), (0, 2.0), (0, 3.0), (0, 4.0)]);
        let refs: Vec<_> = data.iter().collect();
        let b = &box_stats(&refs)[0];
        assert_eq!((b.q1, b.median, b.q3), (1.75, 2.5, 3.25));
    }

    #[test]
    fn groups_by_category_in_order_and_skips_nan() {
        let data = rows(&[(2, 1.0), (-1, 0.5), (2, 3.0), (0, f64::NAN), (-1, 0.7)]);
        let refs: Vec<_> = data.iter().collect();
        let stats = box_stats(&refs);
        let cats: Vec<_> = stats.iter().map(|b| b.category.clone()).collect();
        assert_eq!(cats, vec![CnaCategory::Score(-1), CnaCategory::Score(2)]);
        assert_eq!(stats[1].median, 2.0);
    }

    #[test]
    fn single_value_collapses() {
        let data = rows(&[(0, 0.25)]);
        let refs: Vec<_> = data.iter().collect();
        let b = &box_stats(&refs)[0];
        assert_eq!((b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker), (0.25, 0.25, 0.25, 0.25, 0.25));
    }

    #[test]
    fn empty_input() {
        assert!(box_stats(&[]).is_empty());
    }
}
