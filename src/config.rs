use std::path::PathBuf;
use std::time::Duration;

/// Input directories and archive root of the daily run.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyDirs {
    pub leads: PathBuf,
    pub talk_time: PathBuf,
    pub dials: PathBuf,
    pub team: PathBuf,
    pub archive: PathBuf,
}

impl Default for DailyDirs {
    fn default() -> Self {
        let root = PathBuf::from("raw-data");
        DailyDirs {
            leads: root.join("leads"),
            talk_time: root.join("talk-time"),
            dials: root.join("dials-made"),
            team: root.join("team"),
            archive: root.join("processed"),
        }
    }
}

/// Where and as whom to write.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetsConfig {
    pub service_account_path: PathBuf,
    pub spreadsheet_id: String,
    pub upload_delay: Duration,
}
