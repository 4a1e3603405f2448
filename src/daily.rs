use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use log::info;

use crate::config::DailyDirs;
use crate::intake::process_daily_files;
use crate::prompt::Prompter;
use crate::record::SheetEntry;
use crate::sheets::SheetWriter;
use crate::upload::upload_all;

#[derive(Debug, PartialEq)]
pub struct DailyReport {
    pub entries: Vec<SheetEntry>,
    pub uploaded: usize,
}

/// One daily session: connect, take in the day's exports, ask the operator
/// about every agent, then upload in roster order.
///
/// `connect` runs before any export is read or archived, so bad credentials
/// leave the input folders untouched. It returns `None` for a dry run.
pub fn run_daily<R, W, S, F>(
    dirs: &DailyDirs,
    today: NaiveDate,
    prompter: &mut Prompter<R, W>,
    delay: Duration,
    connect: F,
) -> Result<DailyReport>
where
    R: BufRead,
    W: Write,
    S: SheetWriter,
    F: FnOnce() -> Result<Option<S>>,
{
    let mut writer = connect()?;

    let records = process_daily_files(dirs, today)?;
    let entries = prompter.enrich_all(records)?;

    let uploaded = match writer.as_mut() {
        Some(writer) => upload_all(writer, &entries, delay)?,
        None => 0,
    };
    info!("daily run done, {} of {} agents uploaded", uploaded, entries.len());

    Ok(DailyReport { entries, uploaded })
}
