use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::daily::run_daily;
use crate::prompt::Prompter;
use crate::record::Attendance;
use crate::test_support::{daily_dirs, write_csv, MemoryWriter};

const TALK_TIME: &str = "User Name,Sum of Duration in Minutes\nAlice,12.5\n";
const DIALS: &str = "User Name,Distinct values of Started At\nAlice,3\n";
const ROSTER: &str = "Agent Name\nAlice\nBob\n";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn test_failed_connect_leaves_inputs_in_place() -> Result<()> {
    let root = TempDir::new()?;
    let dirs = daily_dirs(root.path());
    let talk = write_csv(&dirs.talk_time, "talk.csv", TALK_TIME);
    let dials = write_csv(&dirs.dials, "dials.csv", DIALS);
    write_csv(&dirs.team, "team_members.csv", ROSTER);

    let mut output = Vec::new();
    let mut prompter = Prompter::new("".as_bytes(), &mut output, today());
    let result = run_daily(&dirs, today(), &mut prompter, Duration::ZERO, || {
        Err::<Option<MemoryWriter>, _>(anyhow!("GOOGLE_SHEETS_SERVICE_ACCOUNT_PATH is not set"))
    });
    drop(prompter);

    match result {
        Err(err) => assert!(err.to_string().contains("GOOGLE_SHEETS_SERVICE_ACCOUNT_PATH")),
        Ok(_) => bail!("a run without credentials should fail"),
    }

    assert!(talk.is_file());
    assert!(dials.is_file());
    assert!(!dirs.archive.exists());
    // The operator was never asked anything.
    assert!(output.is_empty());

    Ok(())
}

#[test]
fn test_run_daily_uploads_in_roster_order() -> Result<()> {
    let root = TempDir::new()?;
    let dirs = daily_dirs(root.path());
    write_csv(&dirs.talk_time, "talk.csv", TALK_TIME);
    write_csv(&dirs.dials, "dials.csv", DIALS);
    write_csv(&dirs.team, "team_members.csv", ROSTER);

    let mut prompter = Prompter::new("1\n0\n\n3\n0\nsick\n".as_bytes(), Vec::new(), today());
    let mut writer = MemoryWriter::default();
    let report = run_daily(&dirs, today(), &mut prompter, Duration::ZERO, || Ok(Some(&mut writer)))?;

    assert_eq!(report.uploaded, 2);
    let names: Vec<&str> = writer.appended.iter().map(|entry| entry.agent_name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert_eq!(writer.appended[1].attendance, Attendance::Upl);
    assert_eq!(writer.appended[1].notes, "sick");
    assert_eq!(writer.appended[0].date, "19/10/2026");

    Ok(())
}

#[test]
fn test_run_daily_dry_run_uploads_nothing() -> Result<()> {
    let root = TempDir::new()?;
    let dirs = daily_dirs(root.path());
    write_csv(&dirs.talk_time, "talk.csv", TALK_TIME);
    write_csv(&dirs.dials, "dials.csv", DIALS);
    write_csv(&dirs.team, "team_members.csv", ROSTER);

    let mut prompter = Prompter::new("2\n1\n\n2\n0\n\n".as_bytes(), Vec::new(), today());
    let report = run_daily(&dirs, today(), &mut prompter, Duration::ZERO, || Ok(None::<MemoryWriter>))?;

    assert_eq!(report.uploaded, 0);
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].leads, 1);

    Ok(())
}
