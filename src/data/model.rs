use std::collections::{BTreeSet, HashMap};
use std::fmt;

// ---------------------------------------------------------------------------
// CnaCategory – copy-number class of a sample
// ---------------------------------------------------------------------------

/// Copy-number class of one measurement.
///
/// Upstream tables usually carry integer GISTIC scores (-2 … 2) but some
/// exports use text labels such as `"Amplification"`, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CnaCategory {
    Score(i32),
    Label(String),
}

// Scores sort numerically and always before labels.
impl PartialOrd for CnaCategory {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CnaCategory {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CnaCategory::*;
        match (self, other) {
            (Score(a), Score(b)) => a.cmp(b),
            (Label(a), Label(b)) => a.cmp(b),
            (Score(_), Label(_)) => std::cmp::Ordering::Less,
            (Label(_), Score(_)) => std::cmp::Ordering::Greater,
        }
    }
}

impl fmt::Display for CnaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CnaCategory::Score(s) => write!(f, "{s}"),
            CnaCategory::Label(l) => write!(f, "{l}"),
        }
    }
}

impl CnaCategory {
    /// Interpret a raw cell. Integral floats (`"1.0"`) written by Pandas are
    /// treated as scores. Returns `None` for an empty cell.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(i) = s.parse::<i32>() {
            return Some(CnaCategory::Score(i));
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 {
                return Some(CnaCategory::Score(f as i32));
            }
        }
        Some(CnaCategory::Label(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MeasurementRecord – one gene × sample row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub gene: String,
    pub cna_category: CnaCategory,
    /// NaN when the source cell was empty.
    pub protein_expression: f64,
}

/// All measurement rows in file order.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    pub rows: Vec<MeasurementRecord>,
    /// Sorted set of every CNA category seen in the file.
    pub categories: BTreeSet<CnaCategory>,
}

impl MeasurementTable {
    pub fn from_rows(rows: Vec<MeasurementRecord>) -> Self {
        let categories = rows.iter().map(|r| r.cna_category.clone()).collect();
        MeasurementTable { rows, categories }
    }

    /// Distinct gene identifiers in first-seen order.
    pub fn genes(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.gene.as_str()))
            .map(|r| r.gene.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GeneStatRecord – precomputed tests for one gene
// ---------------------------------------------------------------------------

/// One two-group test against the copy-neutral samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Comparison {
    pub t_statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub cohens_d: Option<f64>,
}

impl Comparison {
    /// Whether this side clears both thresholds.
    /// `None` when the p-value or effect size is missing.
    pub fn passes(&self, p_threshold: f64, effect_threshold: f64) -> Option<bool> {
        let p = self.p_value?;
        let d = self.cohens_d?;
        Some(p < p_threshold && d.abs() >= effect_threshold)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneStatRecord {
    pub gene: String,
    /// Amplification vs Neutral.
    pub amplification: Comparison,
    /// Deletion vs Neutral.
    pub deletion: Comparison,
}

impl GeneStatRecord {
    /// Whether both p-values and both effect sizes are present.
    pub fn is_complete(&self) -> bool {
        self.amplification.p_value.is_some()
            && self.deletion.p_value.is_some()
            && self.amplification.cohens_d.is_some()
            && self.deletion.cohens_d.is_some()
    }

    /// The smaller of the two p-values, if both are present.
    pub fn min_p_value(&self) -> Option<f64> {
        let amp = self.amplification.p_value?;
        let del = self.deletion.p_value?;
        Some(amp.min(del))
    }
}

/// Per-gene statistics in file order with a gene index.
#[derive(Debug, Clone, Default)]
pub struct StatsTable {
    pub records: Vec<GeneStatRecord>,
    index: HashMap<String, usize>,
}

impl StatsTable {
    /// Build the table, rejecting a gene that appears twice.
    pub fn from_records(records: Vec<GeneStatRecord>) -> Result<Self, super::SchemaError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            if index.insert(rec.gene.clone(), i).is_some() {
                return Err(super::SchemaError::DuplicateGene(rec.gene.clone()));
            }
        }
        Ok(StatsTable { records, index })
    }

    pub fn get(&self, gene: &str) -> Option<&GeneStatRecord> {
        self.index.get(gene).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
