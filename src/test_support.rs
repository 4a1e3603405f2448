use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DailyDirs;
use crate::record::{Attendance, SheetEntry};
use crate::sheets::{SheetWriter, SheetsError};

pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Input folders under `root`, created empty. The archive root is not created.
pub fn daily_dirs(root: &Path) -> DailyDirs {
    let dirs = DailyDirs {
        leads: root.join("leads"),
        talk_time: root.join("talk-time"),
        dials: root.join("dials-made"),
        team: root.join("team"),
        archive: root.join("processed"),
    };
    for dir in [&dirs.leads, &dirs.talk_time, &dirs.dials, &dirs.team] {
        fs::create_dir_all(dir).unwrap();
    }
    dirs
}

pub fn entry(agent: &str, attendance: Attendance, leads: u32) -> SheetEntry {
    SheetEntry {
        agent_name: agent.to_string(),
        date: "19/10/2026".to_string(),
        attendance,
        leads,
        dials: 3,
        talk_time: 12.5,
        notes: String::new(),
    }
}

/// Collects appended entries. Agents listed in `missing_tabs` fail like a
/// spreadsheet without their tab.
#[derive(Default)]
pub struct MemoryWriter {
    pub appended: Vec<SheetEntry>,
    pub missing_tabs: Vec<String>,
}

impl SheetWriter for MemoryWriter {
    fn append_entry(&mut self, entry: &SheetEntry) -> Result<(), SheetsError> {
        if self.missing_tabs.contains(&entry.agent_name) {
            return Err(SheetsError::WorksheetNotFound(entry.agent_name.clone()));
        }
        self.appended.push(entry.clone());
        Ok(())
    }
}
