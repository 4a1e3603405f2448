use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::auth::{ServiceAccountKey, TokenSource};
use super::format::{a1_range, format_requests, row_values};
use super::{SheetWriter, SheetsError};
use crate::config::SheetsConfig;
use crate::record::SheetEntry;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
pub(crate) struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

impl Spreadsheet {
    /// Id of the tab titled exactly `title`. Case and surrounding spaces count.
    pub(crate) fn sheet_id(&self, title: &str) -> Result<i64, SheetsError> {
        self.sheets
            .iter()
            .find(|sheet| sheet.properties.title == title)
            .map(|sheet| sheet.properties.sheet_id)
            .ok_or_else(|| SheetsError::WorksheetNotFound(title.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// 1-based row an append lands on, below every filled row. The API
    /// leaves `values` out for an empty tab.
    pub(crate) fn next_row(&self) -> u32 {
        self.values.len() as u32 + 1
    }
}

/// Google Sheets v4 client bound to one spreadsheet.
pub struct SheetsClient {
    http: Client,
    tokens: TokenSource,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub fn new(key: ServiceAccountKey, spreadsheet_id: &str) -> Result<SheetsClient, SheetsError> {
        Ok(SheetsClient {
            http: Client::new(),
            tokens: TokenSource::new(key)?,
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }

    pub fn from_config(config: &SheetsConfig) -> Result<SheetsClient, SheetsError> {
        let key = ServiceAccountKey::from_file(&config.service_account_path)?;
        SheetsClient::new(key, &config.spreadsheet_id)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = Url::parse(SHEETS_API).map_err(|err| SheetsError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(SHEETS_API.to_string()))?
            .extend(segments);
        Ok(url)
    }

    fn send<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> Result<T, SheetsError> {
        let token = self.tokens.token(&self.http)?;
        let response = request.bearer_auth(token).send()?;
        Ok(check(response)?.json()?)
    }

    fn sheet_id(&mut self, title: &str) -> Result<i64, SheetsError> {
        let url = self.url(&[self.spreadsheet_id.as_str()])?;
        let request = self.http.get(url).query(&[("fields", "sheets.properties(sheetId,title)")]);
        let spreadsheet: Spreadsheet = self.send(request)?;
        spreadsheet.sheet_id(title)
    }

    /// Row the next append of `title` lands on, judged by column A.
    fn next_row(&mut self, title: &str) -> Result<u32, SheetsError> {
        let range = a1_range(title, "A:A");
        let url = self.url(&[self.spreadsheet_id.as_str(), "values", range.as_str()])?;
        let request = self.http.get(url);
        let values: ValueRange = self.send(request)?;
        Ok(values.next_row())
    }
}

impl SheetWriter for SheetsClient {
    fn append_entry(&mut self, entry: &SheetEntry) -> Result<(), SheetsError> {
        let title = entry.agent_name.as_str();
        let sheet_id = self.sheet_id(title)?;
        let new_row = self.next_row(title)?;

        let range = a1_range(title, "A:F");
        let append = format!("{}:append", range);
        let url = self.url(&[self.spreadsheet_id.as_str(), "values", append.as_str()])?;
        let request = self
            .http
            .post(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": [row_values(entry)] }));
        let _: serde_json::Value = self.send(request)?;
        debug!("appended row {} to {}", new_row, title);

        let batch_update = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.url(&[batch_update.as_str()])?;
        let request = self.http.post(url).json(&format_requests(sheet_id, new_row, entry));
        let _: serde_json::Value = self.send(request)?;

        info!("updated sheet for {}", title);

        Ok(())
    }
}

fn check(response: Response) -> Result<Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(SheetsError::Api {
        status: status.as_u16(),
        body: response.text().unwrap_or_default(),
    })
}
