use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info};

use crate::record::SheetEntry;
use crate::sheets::{SheetWriter, SheetsError};

/// Notifications sent by the upload worker.
#[derive(Debug, PartialEq)]
pub enum UploadEvent {
    Uploading(String),
    Progress(u8),
    Finished(UploadSummary),
}

#[derive(Debug, Default, PartialEq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failures: Vec<(String, String)>,
}

impl UploadSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Uploads `entries` one after another on a background thread, pausing
/// `delay` after each. A failing entry is recorded and the rest still run.
///
/// This differs from [`upload_all`], which the interactive daily run uses and
/// which stops at the first failure. A reviewed sheet is uploaded as a batch,
/// so one missing tab should not hold back every agent listed after it. The
/// failed agents come back in [`UploadSummary::failures`] and can be re-sent
/// from a trimmed review sheet.
pub fn spawn_upload<S>(mut writer: S, entries: Vec<SheetEntry>, delay: Duration) -> (Receiver<UploadEvent>, JoinHandle<()>)
where
    S: SheetWriter + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();

    let handle = thread::spawn(move || {
        let total = entries.len();
        let mut summary = UploadSummary::default();

        for (i, entry) in entries.iter().enumerate() {
            // The receiver may be gone, the upload still completes.
            let _ = sender.send(UploadEvent::Uploading(entry.agent_name.clone()));

            match writer.append_entry(entry) {
                Ok(()) => summary.uploaded += 1,
                Err(err) => {
                    error!("upload failed for {}: {}", entry.agent_name, err);
                    summary.failures.push((entry.agent_name.clone(), err.to_string()));
                },
            }

            let _ = sender.send(UploadEvent::Progress(((i + 1) * 100 / total) as u8));
            thread::sleep(delay);
        }

        let _ = sender.send(UploadEvent::Finished(summary));
    });

    (receiver, handle)
}

/// Uploads `entries` in order on the calling thread and stops at the first
/// failure. Rows already written stay written.
pub fn upload_all<S: SheetWriter>(writer: &mut S, entries: &[SheetEntry], delay: Duration) -> Result<usize, SheetsError> {
    for (i, entry) in entries.iter().enumerate() {
        writer.append_entry(entry)?;
        info!("uploaded {} ({}/{})", entry.agent_name, i + 1, entries.len());
        thread::sleep(delay);
    }

    Ok(entries.len())
}
