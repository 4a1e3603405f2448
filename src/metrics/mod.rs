use std::path::PathBuf;

use thiserror::Error;

pub mod extract;
pub mod loader;
pub mod merge;
pub mod roster;


#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("missing expected columns in {}: {columns:?}", path.display())]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    #[error("invalid number {value:?} in column {column:?} of {}", path.display())]
    InvalidNumber {
        path: PathBuf,
        column: String,
        value: String,
    },
    #[error("roster {} has no agents", .0.display())]
    EmptyRoster(PathBuf),
}
