use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::SchemaError;
use super::model::{
    CnaCategory, Comparison, GeneStatRecord, MeasurementRecord, MeasurementTable, StatsTable,
};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const GENE: &str = "Gene";
pub const CNA: &str = "CNA";
pub const PROTEIN: &str = "Protein";

pub const AMP_T: &str = "T-statistic (Amplification vs Neutral)";
pub const AMP_P: &str = "P-value (Amplification vs Neutral)";
pub const AMP_D: &str = "Cohen's d (Amplification vs Neutral)";
pub const DEL_T: &str = "T-statistic (Deletion vs Neutral)";
pub const DEL_P: &str = "P-value (Deletion vs Neutral)";
pub const DEL_D: &str = "Cohen's d (Deletion vs Neutral)";

const MEASUREMENT_COLUMNS: [&str; 3] = [GENE, CNA, PROTEIN];
const STATS_COLUMNS: [&str; 7] = [GENE, AMP_T, AMP_P, AMP_D, DEL_T, DEL_P, DEL_D];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the long-format CNA / protein table.
pub fn load_measurements(path: &Path) -> Result<MeasurementTable> {
    let raw = read_table(path).with_context(|| format!("reading {}", path.display()))?;
    let table = measurements_from_raw(&raw)
        .with_context(|| format!("reading measurements from {}", path.display()))?;
    log::info!(
        "Loaded {} measurement rows ({} CNA categories) from {}",
        table.len(),
        table.categories.len(),
        path.display()
    );
    Ok(table)
}

/// Load the per-gene statistics table.
pub fn load_stats(path: &Path) -> Result<StatsTable> {
    let raw = read_table(path).with_context(|| format!("reading {}", path.display()))?;
    let table = stats_from_raw(&raw)
        .with_context(|| format!("reading statistics from {}", path.display()))?;
    log::info!("Loaded statistics for {} genes from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Format-independent intermediate table
// ---------------------------------------------------------------------------

/// A single cell before typing.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Null,
}

static NULL_CELL: Cell = Cell::Null;

/// Header plus row-major cells, as read from any supported format.
#[derive(Debug, Default)]
struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Resolve the positions of `required` columns or report every missing one.
    fn require<const N: usize>(
        &self,
        table: &'static str,
        required: [&str; N],
    ) -> Result<[usize; N], SchemaError> {
        let mut idx = [0usize; N];
        let mut missing = Vec::new();
        for (slot, name) in idx.iter_mut().zip(required) {
            match self.columns.iter().position(|c| c == name) {
                Some(i) => *slot = i,
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(idx)
        } else {
            Err(SchemaError::MissingColumns {
                table,
                columns: missing,
            })
        }
    }

    fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows[row].get(col).unwrap_or(&NULL_CELL)
    }
}

/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv`              – header row, one record per line
/// * `.parquet` / `.pq`  – flat columns of strings and numbers
/// * `.json`             – `[{ "Gene": "...", ... }, ...]`
fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path),
        "parquet" | "pq" => read_parquet(path),
        "json" => read_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Typed conversion
// ---------------------------------------------------------------------------

fn measurements_from_raw(raw: &RawTable) -> Result<MeasurementTable, SchemaError> {
    let [gene_idx, cna_idx, protein_idx] = raw.require("measurement", MEASUREMENT_COLUMNS)?;

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut missing_protein = 0usize;
    for row in 0..raw.rows.len() {
        let gene = text_cell(raw.cell(row, gene_idx), row, GENE)?;
        let cna_category = category_cell(raw.cell(row, cna_idx), row)?;
        let protein_expression = match number_cell(raw.cell(row, protein_idx), row, PROTEIN)? {
            Some(v) => v,
            None => {
                missing_protein += 1;
                f64::NAN
            }
        };
        rows.push(MeasurementRecord {
            gene,
            cna_category,
            protein_expression,
        });
    }
    if missing_protein > 0 {
        log::debug!("{missing_protein} measurement rows have no protein value");
    }
    Ok(MeasurementTable::from_rows(rows))
}

fn stats_from_raw(raw: &RawTable) -> Result<StatsTable, SchemaError> {
    let [gene, amp_t, amp_p, amp_d, del_t, del_p, del_d] = raw.require("statistics", STATS_COLUMNS)?;

    let mut records = Vec::with_capacity(raw.rows.len());
    for row in 0..raw.rows.len() {
        records.push(GeneStatRecord {
            gene: text_cell(raw.cell(row, gene), row, GENE)?,
            amplification: comparison_cells(raw, row, [amp_t, amp_p, amp_d], [AMP_T, AMP_P, AMP_D])?,
            deletion: comparison_cells(raw, row, [del_t, del_p, del_d], [DEL_T, DEL_P, DEL_D])?,
        });
    }

    let incomplete = records.iter().filter(|r| !r.is_complete()).count();
    if incomplete > 0 {
        log::debug!("{incomplete} genes have incomplete statistics and can never pass the filter");
    }
    StatsTable::from_records(records)
}

/// `idx` and `names` are ordered t-statistic, p-value, Cohen's d.
fn comparison_cells(
    raw: &RawTable,
    row: usize,
    idx: [usize; 3],
    names: [&str; 3],
) -> Result<Comparison, SchemaError> {
    Ok(Comparison {
        t_statistic: number_cell(raw.cell(row, idx[0]), row, names[0])?,
        p_value: number_cell(raw.cell(row, idx[1]), row, names[1])?,
        cohens_d: number_cell(raw.cell(row, idx[2]), row, names[2])?,
    })
}

fn text_cell(cell: &Cell, row: usize, column: &str) -> Result<String, SchemaError> {
    match cell {
        Cell::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Cell::Number(n) => Ok(n.to_string()),
        _ => Err(SchemaError::EmptyCell {
            row,
            column: column.to_string(),
        }),
    }
}

fn category_cell(cell: &Cell, row: usize) -> Result<CnaCategory, SchemaError> {
    let parsed = match cell {
        Cell::Text(s) => CnaCategory::parse(s),
        Cell::Number(n) => CnaCategory::parse(&n.to_string()),
        Cell::Null => None,
    };
    parsed.ok_or_else(|| SchemaError::EmptyCell {
        row,
        column: CNA.to_string(),
    })
}

/// Text tokens read as missing, matching the default `na_values` of
/// `pandas.read_csv`. Matching is exact and case-sensitive.
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Null cells and the `MISSING_MARKERS` tokens are missing values, not errors.
fn number_cell(cell: &Cell, row: usize, column: &str) -> Result<Option<f64>, SchemaError> {
    let value = match cell {
        Cell::Null => return Ok(None),
        Cell::Number(n) => *n,
        Cell::Text(s) => {
            let s = s.trim();
            if is_missing_marker(s) {
                return Ok(None);
            }
            s.parse::<f64>().map_err(|_| SchemaError::InvalidNumber {
                row,
                column: column.to_string(),
                value: s.to_string(),
            })?
        }
    };
    Ok(if value.is_nan() { None } else { Some(value) })
}

fn is_missing_marker(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|v| Cell::Text(v.to_string())).collect());
    }

    Ok(RawTable { columns, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Gene": "EGFR", "CNA": 2, "Protein": 1.37 },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(Cell::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table as written by `df.to_parquet()` (Pandas) or
/// `df.write_parquet()` (Polars).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { columns, rows })
}

/// Extract a single cell from an Arrow column at a given row.
///
/// Strings and numbers are read directly. Any other type (booleans, dates,
/// dictionary-encoded categoricals, ...) goes through Arrow's display
/// formatting, so columns the app never reads cannot fail a load.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        other => match array_value_to_string(col.as_ref(), row) {
            Ok(text) => Cell::Text(text),
            Err(e) => {
                log::debug!("Cannot display parquet value of type {other:?}: {e}");
                Cell::Null
            }
        },
    }
}
