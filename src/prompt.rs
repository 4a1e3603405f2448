use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use thiserror::Error;

use crate::record::{AgentRecord, Attendance, RecordError, SheetEntry, SHEET_DATE_FORMAT};

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("input ended before all agents were processed")]
    UnexpectedEof,
    #[error("{0}")]
    Record(#[from] RecordError),
}

/// Line-prompted enrichment of merged records.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    today: NaiveDate,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// `today` dates records the merge left undated.
    pub fn new(input: R, output: W, today: NaiveDate) -> Prompter<R, W> {
        Prompter { input, output, today }
    }

    /// Asks for attendance, leads and notes of one agent.
    pub fn enrich(&mut self, mut record: AgentRecord) -> Result<SheetEntry, PromptError> {
        let agent = record.agent_name.clone();
        writeln!(self.output, "\n Agent: {}", agent)?;
        writeln!(self.output, " • Talk Time: {} mins", record.talk_time)?;
        writeln!(self.output, " • Dials Made: {}", record.dials)?;

        if record.date.is_none() {
            record.date = Some(self.today.format(SHEET_DATE_FORMAT).to_string());
        }
        writeln!(self.output, "Date: {}", record.date.as_deref().unwrap_or_default())?;

        record.attendance = Some(self.ask_attendance(&agent)?);
        record.leads = self.ask_leads(&agent, record.leads)?;
        record.notes = self.ask(&format!("Any notes for {}? Press Enter to skip: ", agent))?;

        Ok(SheetEntry::try_from(record)?)
    }

    pub fn enrich_all(&mut self, records: Vec<AgentRecord>) -> Result<Vec<SheetEntry>, PromptError> {
        records.into_iter().map(|record| self.enrich(record)).collect()
    }

    fn ask_attendance(&mut self, agent: &str) -> Result<Attendance, PromptError> {
        loop {
            let answer = self.ask(&format!("Attendance for {} (1=Office, 2=Home, 3=UPL): ", agent))?;
            match answer.as_str() {
                "1" => return Ok(Attendance::Office),
                "2" => return Ok(Attendance::Home),
                "3" => return Ok(Attendance::Upl),
                _ => continue,
            }
        }
    }

    // A non-zero extracted count can be kept with Enter, zero needs a number.
    fn ask_leads(&mut self, agent: &str, found: u32) -> Result<u32, PromptError> {
        loop {
            let answer = if found > 0 {
                let answer = self.ask(&format!(
                    "Leads (found {}; press Enter to keep or type new number): ",
                    found
                ))?;
                if answer.is_empty() {
                    return Ok(found);
                }
                answer
            } else {
                self.ask(&format!("Leads for {} (enter number): ", agent))?
            };

            match answer.parse() {
                Ok(leads) => return Ok(leads),
                Err(_) => writeln!(self.output, "{:?} is not a number, try again", answer)?,
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::UnexpectedEof);
        }

        Ok(line.trim().to_string())
    }
}
