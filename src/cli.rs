use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::Thresholds;

/// Browse genes whose protein expression tracks copy-number changes.
#[derive(Debug, Clone, Parser)]
#[command(name = "gene-explorer", version, about)]
pub struct Cli {
    /// Long-format CNA / protein table (columns Gene, CNA, Protein)
    #[arg(long, default_value = "data/cnv_prot_boxplot.csv")]
    pub measurements: PathBuf,

    /// Per-gene statistics table
    #[arg(long, default_value = "data/per_gene_stats_filtered.csv")]
    pub stats: PathBuf,

    /// Initial p-value cutoff (strict)
    #[arg(long, default_value_t = 0.05, value_parser = non_negative)]
    pub p_threshold: f64,

    /// Initial |Cohen's d| cutoff (inclusive)
    #[arg(long, default_value_t = 0.3, value_parser = non_negative)]
    pub effect_threshold: f64,

    /// Write the ranked gene list (.csv or .json) and exit without a window
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl Cli {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            p_value: self.p_threshold,
            effect_size: self.effect_threshold,
        }
    }
}

fn non_negative(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if v.is_nan() || v < 0.0 {
        return Err(format!("{s} must be a non-negative number"));
    }
    Ok(v)
}
