use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, LargeListArray, ListArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use pyma_reader::FeatureMap;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load feature rows from a file.  Dispatch by extension.
///
/// Every row maps feature names to vectors. Supported formats:
/// * `.parquet` – one List<Float64> / List<Float32> column per feature
/// * `.json`    – `[{ "spectrum": [...], "temperature": [...] }, ...]`
/// * `.csv`     – header row of feature names, semicolon-separated floats
pub fn load_file(path: &Path) -> Result<Vec<FeatureMap>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "spectrum": [0.12, 0.14, 0.11], "temperature": [21.5], "sample": "A" },
///   ...
/// ]
/// ```
///
/// Keys whose value is not an array (sample ids, operators, ...) are
/// skipped; arrays must hold only numbers.
fn load_json(path: &Path) -> Result<Vec<FeatureMap>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;

            let mut row = FeatureMap::new();
            for (key, val) in obj {
                let Some(arr) = val.as_array() else {
                    log::debug!("Row {i}: skipping non-array field '{key}'");
                    continue;
                };
                let values = arr
                    .iter()
                    .enumerate()
                    .map(|(j, v)| {
                        v.as_f64()
                            .with_context(|| format!("Row {i}, {key}[{j}]: not a number"))
                    })
                    .collect::<Result<Vec<f64>>>()?;
                row.insert(key.clone(), values);
            }
            Ok(row)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with feature names; each cell holds the vector
/// as semicolon-separated floats, e.g. `"0.12;0.14;0.11"`. An empty cell is
/// an empty vector.
fn load_csv(path: &Path) -> Result<Vec<FeatureMap>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut row = FeatureMap::new();
        for (col_idx, cell) in record.iter().enumerate() {
            let name = headers
                .get(col_idx)
                .with_context(|| format!("CSV row {row_no}: more cells than headers"))?;
            row.insert(name.clone(), parse_semicolon_floats(cell, row_no, name)?);
        }
        rows.push(row);
    }

    Ok(rows)
}

fn parse_semicolon_floats(s: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of feature rows.
///
/// Every `List<Float64>` / `LargeList<Float64>` (or Float32) column becomes
/// a feature; scalar columns are treated as metadata and skipped. Works with
/// files written by both Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Vec<FeatureMap>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let feature_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| matches!(f.data_type(), DataType::List(_) | DataType::LargeList(_)))
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row_idx in 0..batch.num_rows() {
            let mut row = FeatureMap::new();
            for (col_idx, name) in &feature_cols {
                let values = extract_f64_list(batch.column(*col_idx), row_idx)
                    .with_context(|| format!("Row {}: failed to read '{name}'", rows.len()))?;
                row.insert(name.clone(), values);
            }
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => col
            .as_any()
            .downcast_ref::<ListArray>()
            .context("expected ListArray")?
            .value(row),
        DataType::LargeList(_) => col
            .as_any()
            .downcast_ref::<LargeListArray>()
            .context("expected LargeListArray")?
            .value(row),
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    // Null elements inside a list have no numeric meaning for a pipeline.
    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        f64_arr
            .iter()
            .enumerate()
            .map(|(j, v)| v.with_context(|| format!("null element at index {j}")))
            .collect()
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        f32_arr
            .iter()
            .enumerate()
            .map(|(j, v)| {
                v.map(f64::from)
                    .with_context(|| format!("null element at index {j}"))
            })
            .collect()
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )
    }
}
