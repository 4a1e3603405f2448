use std::collections::HashMap;
use std::path::Path;

use log::debug;

use super::MetricsError;

/// One CSV record keyed by its header names.
pub type Row = HashMap<String, String>;

/// Reads a headed, comma-delimited UTF-8 file into rows.
///
/// A file holding only a header row yields an empty vector. Cells are kept
/// verbatim, no trimming or typing happens here.
pub fn load_rows(path: &Path) -> Result<Vec<Row>, MetricsError> {
    if !path.exists() {
        return Err(MetricsError::NotFound(path.to_path_buf()));
    }

    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        // Short records read as empty cells.
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.to_string(), record.get(i).unwrap_or_default().to_string()))
            .collect();
        rows.push(row);
    }

    debug!("loaded {} rows from {}", rows.len(), path.display());

    Ok(rows)
}

/// Names of `required` that the first row does not carry. No rows means every
/// required column is missing.
pub fn missing_columns(rows: &[Row], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|column| rows.first().map_or(true, |row| !row.contains_key(**column)))
        .map(|column| column.to_string())
        .collect()
}
