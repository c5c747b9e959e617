/// Data layer: core types, loading, filtering, and per-gene views.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate columns → MeasurementTable, StatsTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  p-value / effect-size cut-offs → ranked genes
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  lookup   │  gene → measurement rows + stat record
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  per-CNA box statistics for plotting
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod lookup;
pub mod model;
pub mod summary;

use thiserror::Error;

/// Structural problems in an input table, detected once at load time.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("{table} table is missing required column(s): {}", .columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<String>,
    },
    #[error("gene {0:?} appears more than once in the statistics table")]
    DuplicateGene(String),
    #[error("row {row}: empty value in column {column:?}")]
    EmptyCell { row: usize, column: String },
    #[error("row {row}, column {column:?}: {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}
