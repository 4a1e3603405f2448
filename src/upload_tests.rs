use std::time::Duration;

use anyhow::{bail, Result};
use pretty_assertions::assert_eq;

use crate::record::Attendance;
use crate::sheets::SheetsError;
use crate::test_support::{entry, MemoryWriter};
use crate::upload::{spawn_upload, upload_all, UploadEvent, UploadSummary};

#[test]
fn test_spawn_upload_reports_progress() -> Result<()> {
    let entries = vec![entry("Alice", Attendance::Office, 1), entry("Bob", Attendance::Home, 0)];

    let (events, handle) = spawn_upload(MemoryWriter::default(), entries, Duration::ZERO);
    let events: Vec<UploadEvent> = events.into_iter().collect();
    if handle.join().is_err() {
        bail!("upload worker panicked");
    }

    assert_eq!(
        events,
        vec![
            UploadEvent::Uploading("Alice".to_string()),
            UploadEvent::Progress(50),
            UploadEvent::Uploading("Bob".to_string()),
            UploadEvent::Progress(100),
            UploadEvent::Finished(UploadSummary {
                uploaded: 2,
                failures: vec![],
            }),
        ]
    );

    Ok(())
}

#[test]
fn test_spawn_upload_collects_failures() -> Result<()> {
    let writer = MemoryWriter {
        missing_tabs: vec!["Bob".to_string()],
        ..Default::default()
    };
    let entries = vec![
        entry("Alice", Attendance::Office, 1),
        entry("Bob", Attendance::Home, 0),
        entry("Carol", Attendance::Upl, 0),
    ];

    let (events, handle) = spawn_upload(writer, entries, Duration::ZERO);
    let summary = events.into_iter().find_map(|event| match event {
        UploadEvent::Finished(summary) => Some(summary),
        _ => None,
    });
    if handle.join().is_err() {
        bail!("upload worker panicked");
    }

    let Some(summary) = summary else {
        bail!("the worker should always report a summary");
    };
    assert_eq!(summary.uploaded, 2);
    assert_eq!(summary.is_success(), false);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, "Bob");
    assert!(summary.failures[0].1.contains("'Bob' not found"));

    Ok(())
}

#[test]
fn test_upload_all_stops_at_first_failure() -> Result<()> {
    let mut writer = MemoryWriter {
        missing_tabs: vec!["Bob".to_string()],
        ..Default::default()
    };
    let entries = vec![
        entry("Alice", Attendance::Office, 1),
        entry("Bob", Attendance::Home, 0),
        entry("Carol", Attendance::Upl, 0),
    ];

    match upload_all(&mut writer, &entries, Duration::ZERO) {
        Err(SheetsError::WorksheetNotFound(agent)) => assert_eq!(agent, "Bob"),
        Err(other) => bail!("expected a missing worksheet, got {}", other),
        Ok(_) => bail!("the upload should stop at Bob"),
    }

    // Alice stays uploaded, Carol is never attempted.
    assert_eq!(writer.appended.len(), 1);
    assert_eq!(writer.appended[0].agent_name, "Alice");

    Ok(())
}

#[test]
fn test_upload_all() -> Result<()> {
    let mut writer = MemoryWriter::default();
    let entries = vec![entry("Alice", Attendance::Office, 1), entry("Bob", Attendance::Home, 0)];

    assert_eq!(upload_all(&mut writer, &entries, Duration::ZERO)?, 2);
    assert_eq!(writer.appended, entries);

    Ok(())
}
