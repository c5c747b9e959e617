use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::filter::RankedGene;
use super::loader::{AMP_D, AMP_P, AMP_T, DEL_D, DEL_P, DEL_T, GENE};
use super::model::StatsTable;

/// CSV header, in `ExportRow` field order.
const EXPORT_COLUMNS: [&str; 8] = [GENE, "Min P-value", AMP_T, AMP_P, AMP_D, DEL_T, DEL_P, DEL_D];

/// One exported line: the ranking key plus the six source statistics.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Gene")]
    gene: &'a str,
    #[serde(rename = "Min P-value")]
    min_p_value: f64,
    #[serde(rename = "T-statistic (Amplification vs Neutral)")]
    amp_t: Option<f64>,
    #[serde(rename = "P-value (Amplification vs Neutral)")]
    amp_p: Option<f64>,
    #[serde(rename = "Cohen's d (Amplification vs Neutral)")]
    amp_d: Option<f64>,
    #[serde(rename = "T-statistic (Deletion vs Neutral)")]
    del_t: Option<f64>,
    #[serde(rename = "P-value (Deletion vs Neutral)")]
    del_p: Option<f64>,
    #[serde(rename = "Cohen's d (Deletion vs Neutral)")]
    del_d: Option<f64>,
}

fn export_rows<'a>(ranked: &'a [RankedGene], stats: &'a StatsTable) -> Vec<ExportRow<'a>> {
    ranked
        .iter()
        .filter_map(|r| {
            let rec = stats.records.get(r.record_index)?;
            Some(ExportRow {
                gene: &r.gene,
                min_p_value: r.min_p_value,
                amp_t: rec.amplification.t_statistic,
                amp_p: rec.amplification.p_value,
                amp_d: rec.amplification.cohens_d,
                del_t: rec.deletion.t_statistic,
                del_p: rec.deletion.p_value,
                del_d: rec.deletion.cohens_d,
            })
        })
        .collect()
}

/// Write the ranked genes to `path`. `.json` writes an array of objects,
/// anything else writes CSV.
pub fn write_ranked(path: &Path, ranked: &[RankedGene], stats: &StatsTable) -> Result<()> {
    let rows = export_rows(ranked, stats);
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &rows).context("writing JSON export")?;
        writer.flush().context("flushing JSON export")?;
    } else {
        // The header is written explicitly so an empty ranking still gets one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(EXPORT_COLUMNS).context("writing CSV header")?;
        for row in &rows {
            writer.serialize(row).context("writing CSV export")?;
        }
        writer.flush().context("flushing CSV export")?;
    }

    log::info!("Exported {} ranked genes to {}", rows.len(), path.display());
    Ok(())
}
