use std::path::{Path, PathBuf};

use getset::Getters;
use log::{info, warn};

use super::extract::{MetricIndex, DIALS_COLUMNS, LEADS_COLUMNS, TALK_TIME_COLUMNS};
use super::roster::load_roster;
use super::MetricsError;
use crate::record::AgentRecord;

/// The files consumed by one processing run. Leads are optional.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct InputFileSet {
    talk_time: PathBuf,
    dials: PathBuf,
    leads: Option<PathBuf>,
    roster: PathBuf,
}

impl InputFileSet {
    pub fn new(talk_time: PathBuf, dials: PathBuf, leads: Option<PathBuf>, roster: PathBuf) -> InputFileSet {
        InputFileSet {
            talk_time,
            dials,
            leads,
            roster,
        }
    }

    /// The metric exports that get archived after a run. The roster stays.
    pub fn metric_files(&self) -> Vec<&Path> {
        let mut files = vec![self.talk_time.as_path(), self.dials.as_path()];
        if let Some(leads) = &self.leads {
            files.push(leads.as_path());
        }
        files
    }
}

/// The three metric exports, each parsed once.
pub struct MetricSources {
    talk_time: MetricIndex,
    dials: MetricIndex,
    leads: Option<MetricIndex>,
}

impl MetricSources {
    pub fn load(talk_time: &Path, dials: &Path, leads: Option<&Path>) -> Result<MetricSources, MetricsError> {
        Ok(MetricSources {
            talk_time: MetricIndex::load(talk_time, TALK_TIME_COLUMNS)?,
            dials: MetricIndex::load(dials, DIALS_COLUMNS)?,
            leads: leads.map(|path| MetricIndex::load(path, LEADS_COLUMNS)).transpose()?,
        })
    }

    /// Looks `agent` up in every export. Without a leads export the lead
    /// count is zero.
    pub fn merge_agent(&self, agent: &str) -> Result<AgentRecord, MetricsError> {
        let talk_time = self.talk_time.talk_time(agent)?;
        let dials = self.dials.count(agent)?;
        let leads = match &self.leads {
            Some(index) => index.count(agent)?,
            None => 0,
        };

        Ok(AgentRecord::new(agent, talk_time, dials, leads))
    }
}

/// Merges a single agent straight from the files on disk.
pub fn merge_agent(
    agent: &str,
    talk_time: &Path,
    dials: &Path,
    leads: Option<&Path>,
) -> Result<AgentRecord, MetricsError> {
    MetricSources::load(talk_time, dials, leads)?.merge_agent(agent)
}

/// One record per roster entry, in roster order.
pub fn merge_team(files: &InputFileSet) -> Result<Vec<AgentRecord>, MetricsError> {
    let agents = load_roster(files.roster())?;
    let sources = MetricSources::load(files.talk_time(), files.dials(), files.leads().as_deref())?;

    let mut records = Vec::with_capacity(agents.len());
    for agent in &agents {
        let record = sources.merge_agent(agent)?;
        if record.talk_time == 0.0 && record.dials == 0 && record.leads == 0 {
            warn!("no metrics found for {:?}, check the name matches the exports", agent);
        }
        records.push(record);
    }

    info!("merged metrics for {} agents", records.len());

    Ok(records)
}
