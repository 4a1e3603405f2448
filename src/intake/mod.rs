use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info};
use thiserror::Error;

use crate::config::DailyDirs;
use crate::metrics::merge::{merge_team, InputFileSet};
use crate::metrics::MetricsError;
use crate::record::AgentRecord;


/// Day format of the archive sub-directories.
pub const ARCHIVE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("input directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("multiple CSVs in {}: {files:?}", dir.display())]
    MultipleFiles { dir: PathBuf, files: Vec<String> },
    #[error("missing required CSVs: {0:?}")]
    MissingRequired(Vec<&'static str>),
    #[error("{0}")]
    Metrics(#[from] MetricsError),
    #[error("failed to archive {}: {source}", path.display())]
    Archive { path: PathBuf, source: io::Error },
}

/// The sole `.csv` file (case-insensitive) in `dir`, if any.
pub fn find_single_csv(dir: &Path) -> Result<Option<PathBuf>, IntakeError> {
    let entries = fs::read_dir(dir).map_err(|_| IntakeError::DirectoryNotFound(dir.to_path_buf()))?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|_| IntakeError::DirectoryNotFound(dir.to_path_buf()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        // The lossy name is only for matching and messages, the path stays exact.
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().ends_with(".csv") {
            matches.push((name, path));
        }
    }
    matches.sort();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop().map(|(_, path)| path)),
        _ => Err(IntakeError::MultipleFiles {
            dir: dir.to_path_buf(),
            files: matches.into_iter().map(|(name, _)| name).collect(),
        }),
    }
}

/// Locates one file per input directory. Only the leads file may be absent.
pub fn discover_inputs(dirs: &DailyDirs) -> Result<InputFileSet, IntakeError> {
    let leads = find_single_csv(&dirs.leads)?;
    let talk_time = find_single_csv(&dirs.talk_time)?;
    let dials = find_single_csv(&dirs.dials)?;
    let roster = find_single_csv(&dirs.team)?;

    let mut missing = Vec::new();
    if talk_time.is_none() {
        missing.push("talk time");
    }
    if dials.is_none() {
        missing.push("dials-made");
    }
    if roster.is_none() {
        missing.push("team members");
    }

    match (talk_time, dials, roster) {
        (Some(talk_time), Some(dials), Some(roster)) => {
            debug!(
                "inputs: talk time {}, dials {}, leads {:?}, roster {}",
                talk_time.display(),
                dials.display(),
                leads,
                roster.display()
            );
            Ok(InputFileSet::new(talk_time, dials, leads, roster))
        },
        _ => Err(IntakeError::MissingRequired(missing)),
    }
}

/// Moves every metric export into `<archive_root>/<YYYY-MM-DD>/`.
pub fn archive_inputs(files: &InputFileSet, archive_root: &Path, today: NaiveDate) -> Result<PathBuf, IntakeError> {
    let archive_dir = archive_root.join(today.format(ARCHIVE_DATE_FORMAT).to_string());
    fs::create_dir_all(&archive_dir).map_err(|source| IntakeError::Archive {
        path: archive_dir.clone(),
        source,
    })?;

    let mut moves = Vec::new();
    for path in files.metric_files() {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = archive_dir.join(name);
        // Never replace an export archived earlier today or earlier in this
        // run. Every target is checked before the first move.
        if target.exists() || moves.iter().any(|(_, planned)| planned == &target) {
            return Err(IntakeError::Archive {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} already exists", target.display()),
                ),
            });
        }
        moves.push((path, target));
    }

    for (path, target) in moves {
        move_file(path, &target).map_err(|source| IntakeError::Archive {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("archived {} to {}", path.display(), target.display());
    }

    Ok(archive_dir)
}

// `rename` cannot cross filesystems, fall back to copy and delete.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Runs one day's intake: discover the exports, merge the team, stamp every
/// record with `today` and archive the consumed exports.
///
/// Nothing is moved unless the merge succeeded.
pub fn process_daily_files(dirs: &DailyDirs, today: NaiveDate) -> Result<Vec<AgentRecord>, IntakeError> {
    let files = discover_inputs(dirs)?;

    let mut records = merge_team(&files)?;
    for record in &mut records {
        record.stamp_date(today);
    }

    let archive_dir = archive_inputs(&files, &dirs.archive, today)?;
    info!("archived {} files to {}", files.metric_files().len(), archive_dir.display());

    Ok(records)
}
