use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day format written to the spreadsheet.
pub const SHEET_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, PartialEq, Error)]
pub enum RecordError {
    #[error("no date set for {0}")]
    MissingDate(String),
    #[error("no attendance set for {0}")]
    MissingAttendance(String),
    #[error("unknown attendance {0:?}, expected Office, Home or UPL")]
    UnknownAttendance(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attendance {
    Office,
    Home,
    #[serde(rename = "UPL")]
    Upl,
}

impl Attendance {
    /// Office and home both count as worked days.
    pub fn is_present(&self) -> bool {
        matches!(self, Attendance::Office | Attendance::Home)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Attendance::Office => "Office",
            Attendance::Home => "Home",
            Attendance::Upl => "UPL",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attendance {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Office" => Ok(Attendance::Office),
            "Home" => Ok(Attendance::Home),
            "UPL" => Ok(Attendance::Upl),
            other => Err(RecordError::UnknownAttendance(other.to_string())),
        }
    }
}

/// Metrics merged for one roster entry. `date`, `attendance` and `notes` are
/// filled in after the merge.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRecord {
    pub agent_name: String,
    pub talk_time: f64,
    pub dials: u32,
    pub leads: u32,
    pub date: Option<String>,
    pub attendance: Option<Attendance>,
    pub notes: String,
}

impl AgentRecord {
    pub fn new(agent_name: impl Into<String>, talk_time: f64, dials: u32, leads: u32) -> AgentRecord {
        AgentRecord {
            agent_name: agent_name.into(),
            talk_time,
            dials,
            leads,
            date: None,
            attendance: None,
            notes: String::new(),
        }
    }

    pub fn stamp_date(&mut self, day: NaiveDate) {
        self.date = Some(day.format(SHEET_DATE_FORMAT).to_string());
    }
}

/// A fully enriched record, ready to append to the agent's tab.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetEntry {
    pub agent_name: String,
    pub date: String,
    pub attendance: Attendance,
    pub leads: u32,
    pub dials: u32,
    pub talk_time: f64,
    pub notes: String,
}

impl SheetEntry {
    /// Replaces the row date with `day`, for sheets reviewed on an earlier day.
    pub fn stamp_date(&mut self, day: NaiveDate) {
        self.date = day.format(SHEET_DATE_FORMAT).to_string();
    }
}

impl TryFrom<AgentRecord> for SheetEntry {
    type Error = RecordError;

    fn try_from(record: AgentRecord) -> Result<Self, Self::Error> {
        let Some(date) = record.date else {
            return Err(RecordError::MissingDate(record.agent_name));
        };
        let Some(attendance) = record.attendance else {
            return Err(RecordError::MissingAttendance(record.agent_name));
        };

        Ok(SheetEntry {
            agent_name: record.agent_name,
            date,
            attendance,
            leads: record.leads,
            dials: record.dials,
            talk_time: record.talk_time,
            notes: record.notes,
        })
    }
}

/// One line of the review sheet the operator edits before upload.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "Agent Name")]
    pub agent_name: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Attendance")]
    pub attendance: Attendance,
    #[serde(rename = "Leads")]
    pub leads: u32,
    #[serde(rename = "Talk Time")]
    pub talk_time: f64,
    #[serde(rename = "Dials Made")]
    pub dials: u32,
    #[serde(rename = "Notes", default)]
    pub notes: String,
}

impl TryFrom<&AgentRecord> for ReviewRecord {
    type Error = RecordError;

    fn try_from(record: &AgentRecord) -> Result<Self, Self::Error> {
        let date = record
            .date
            .clone()
            .ok_or_else(|| RecordError::MissingDate(record.agent_name.clone()))?;

        Ok(ReviewRecord {
            agent_name: record.agent_name.clone(),
            date,
            attendance: record.attendance.unwrap_or(Attendance::Office),
            leads: record.leads,
            talk_time: record.talk_time,
            dials: record.dials,
            notes: record.notes.clone(),
        })
    }
}

impl From<ReviewRecord> for SheetEntry {
    fn from(review: ReviewRecord) -> Self {
        SheetEntry {
            agent_name: review.agent_name,
            date: review.date,
            attendance: review.attendance,
            leads: review.leads,
            dials: review.dials,
            talk_time: review.talk_time,
            notes: review.notes,
        }
    }
}

pub fn export_review<W: Write>(records: &[AgentRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    for record in records {
        let review = ReviewRecord::try_from(record)?;
        csv_writer.serialize(review)?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Reads an edited review sheet. Cells are not trimmed, agent names must
/// still match their tab exactly.
pub fn import_review<R: Read>(reader: R) -> Result<Vec<SheetEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);

    let mut entries = Vec::new();
    for record in csv_reader.deserialize::<ReviewRecord>() {
        entries.push(record?.into());
    }

    Ok(entries)
}
