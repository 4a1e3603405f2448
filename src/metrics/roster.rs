use std::path::Path;

use super::loader::{load_rows, missing_columns};
use super::MetricsError;

pub const AGENT_NAME_COLUMN: &str = "Agent Name";

/// Agent names in file order. Duplicates are kept.
pub fn load_roster(path: &Path) -> Result<Vec<String>, MetricsError> {
    let rows = load_rows(path)?;
    if rows.is_empty() {
        return Err(MetricsError::EmptyRoster(path.to_path_buf()));
    }

    let missing = missing_columns(&rows, &[AGENT_NAME_COLUMN]);
    if !missing.is_empty() {
        return Err(MetricsError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    Ok(rows
        .into_iter()
        .map(|mut row| row.remove(AGENT_NAME_COLUMN).unwrap_or_default())
        .collect())
}
