use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;

use super::loader::{load_rows, missing_columns};
use super::MetricsError;

/// The identity column and the value column of one metric export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricColumns {
    pub identity: &'static str,
    pub value: &'static str,
}

pub const TALK_TIME_COLUMNS: MetricColumns = MetricColumns {
    identity: "User Name",
    value: "Sum of Duration in Minutes",
};

pub const DIALS_COLUMNS: MetricColumns = MetricColumns {
    identity: "User Name",
    value: "Distinct values of Started At",
};

pub const LEADS_COLUMNS: MetricColumns = MetricColumns {
    identity: "Sales Rep",
    value: "Count",
};

/// A metric export read once and keyed by identity.
///
/// Lookups match the identity cell exactly (case-sensitive, untrimmed) and
/// the first row for an identity wins. Unknown identities read as zero.
#[derive(Debug)]
pub struct MetricIndex {
    path: PathBuf,
    value_column: &'static str,
    values: HashMap<String, String>,
}

impl MetricIndex {
    pub fn load(path: &Path, columns: MetricColumns) -> Result<MetricIndex, MetricsError> {
        let rows = load_rows(path)?;

        let missing = missing_columns(&rows, &[columns.identity, columns.value]);
        if !missing.is_empty() {
            return Err(MetricsError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }

        let mut values = HashMap::with_capacity(rows.len());
        for mut row in rows {
            let identity = row.remove(columns.identity).unwrap_or_default();
            let value = row.remove(columns.value).unwrap_or_default();
            values.entry(identity).or_insert(value);
        }

        Ok(MetricIndex {
            path: path.to_path_buf(),
            value_column: columns.value,
            values,
        })
    }

    pub fn talk_time(&self, agent: &str) -> Result<f64, MetricsError> {
        let minutes: f64 = self.parse(agent, 0.0)?;
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(self.invalid_number(agent));
        }

        Ok(minutes)
    }

    pub fn count(&self, agent: &str) -> Result<u32, MetricsError> {
        self.parse(agent, 0)
    }

    fn parse<T: FromStr>(&self, agent: &str, default: T) -> Result<T, MetricsError> {
        match self.values.get(agent) {
            Some(value) => value.trim().parse().map_err(|_| self.invalid_number(agent)),
            None => {
                debug!("{} has no row in {}", agent, self.path.display());
                Ok(default)
            },
        }
    }

    fn invalid_number(&self, agent: &str) -> MetricsError {
        MetricsError::InvalidNumber {
            path: self.path.clone(),
            column: self.value_column.to_string(),
            value: self.values.get(agent).cloned().unwrap_or_default(),
        }
    }
}

/// Talk time in minutes for `agent`, `0.0` when the agent has no row.
pub fn extract_talk_time(path: &Path, agent: &str) -> Result<f64, MetricsError> {
    MetricIndex::load(path, TALK_TIME_COLUMNS)?.talk_time(agent)
}

/// Distinct dials for `agent`, `0` when the agent has no row.
pub fn extract_dials(path: &Path, agent: &str) -> Result<u32, MetricsError> {
    MetricIndex::load(path, DIALS_COLUMNS)?.count(agent)
}

/// Lead count for `agent`, `0` when the agent has no row.
pub fn extract_leads(path: &Path, agent: &str) -> Result<u32, MetricsError> {
    MetricIndex::load(path, LEADS_COLUMNS)?.count(agent)
}
