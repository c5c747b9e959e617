use super::model::{GeneStatRecord, MeasurementRecord, MeasurementTable, StatsTable};

/// Everything known about one gene across both tables.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneView<'a> {
    pub gene: &'a str,
    /// Measurement rows for the gene in file order; may be empty.
    pub measurements: Vec<&'a MeasurementRecord>,
    /// `None` when the statistics table has no row for the gene.
    pub stats: Option<&'a GeneStatRecord>,
}

impl GeneView<'_> {
    pub fn has_measurements(&self) -> bool {
        !self.measurements.is_empty()
    }
}

/// Resolve `gene` against the measurement and statistics tables.
pub fn resolve<'a>(
    gene: &'a str,
    measurements: &'a MeasurementTable,
    stats: &'a StatsTable,
) -> GeneView<'a> {
    GeneView {
        gene,
        measurements: measurements
            .rows
            .iter()
            .filter(|r| r.gene == gene)
            .collect(),
        stats: stats.get(gene),
    }
}
