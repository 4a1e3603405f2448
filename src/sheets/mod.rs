use thiserror::Error;

use crate::record::SheetEntry;

pub mod auth;
pub mod client;
pub mod format;


pub use client::SheetsClient;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("worksheet for agent '{0}' not found, please add a tab named '{0}'")]
    WorksheetNotFound(String),
    #[error("invalid service account credentials: {0}")]
    Credentials(String),
    #[error("failed to sign token request: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("sheets api returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Destination of enriched records, one tab per agent.
pub trait SheetWriter {
    /// Appends `entry` as a new row of the tab named after the agent and
    /// colours its attendance and leads cells.
    fn append_entry(&mut self, entry: &SheetEntry) -> Result<(), SheetsError>;
}

impl<S: SheetWriter + ?Sized> SheetWriter for &mut S {
    fn append_entry(&mut self, entry: &SheetEntry) -> Result<(), SheetsError> {
        (**self).append_entry(entry)
    }
}
